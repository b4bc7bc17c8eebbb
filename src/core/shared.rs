//! # Shared State
//!
//! The `Dashboard` behind one mutex, plus a condition variable the renderer
//! sleeps on between ticks.
//!
//! ```text
//!   InputHandler ── update() ──┐           ┌── with() ── Renderer
//!                              ▼           ▼
//!                    Mutex<Dashboard> + Condvar
//!                              │
//!                  notify_all on every update
//!                  (redraw now / shutdown)
//! ```
//!
//! Every read and write happens inside one critical section, so the timer
//! fields and `last_evaluated_at` are always seen together.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::core::state::Dashboard;

pub struct SharedState {
    dashboard: Mutex<Dashboard>,
    changed: Condvar,
}

impl SharedState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Mutex::new(dashboard),
            changed: Condvar::new(),
        }
    }

    // A panic in the other loop must not take the dashboard down with it.
    fn lock(&self) -> MutexGuard<'_, Dashboard> {
        self.dashboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read or mutate without waking the renderer.
    pub fn with<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        let mut dashboard = self.lock();
        f(&mut *dashboard)
    }

    /// Mutate and ask the renderer for a fresh frame right away.
    pub fn update<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        let result = {
            let mut dashboard = self.lock();
            let result = f(&mut *dashboard);
            dashboard.redraw_requested = true;
            result
        };
        self.changed.notify_all();
        result
    }

    pub fn begin_exclusive(&self) {
        self.update(|d| d.awaiting_input = true);
    }

    pub fn end_exclusive(&self) {
        self.update(|d| d.awaiting_input = false);
    }

    pub fn awaiting_input(&self) -> bool {
        self.lock().awaiting_input
    }

    pub fn request_shutdown(&self) {
        self.update(|d| d.should_quit = true);
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().should_quit
    }

    /// Sleeps up to `timeout`, waking early for a redraw request or shutdown.
    /// Returns true if woken early. Consumes the redraw request.
    pub fn wait_for_tick(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (mut dashboard, result) = self
            .changed
            .wait_timeout_while(guard, timeout, |d| !d.redraw_requested && !d.should_quit)
            .unwrap_or_else(PoisonError::into_inner);
        dashboard.redraw_requested = false;
        !result.timed_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_dashboard;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_wait_times_out_without_requests() {
        let shared = SharedState::new(test_dashboard());
        let start = Instant::now();
        assert!(!shared.wait_for_tick(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_update_wakes_waiter() {
        let shared = Arc::new(SharedState::new(test_dashboard()));
        let waker = Arc::clone(&shared);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            waker.update(|d| d.command_buffer.push('s'));
        });

        let start = Instant::now();
        assert!(shared.wait_for_tick(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();

        // The request was consumed
        assert!(!shared.with(|d| d.redraw_requested));
    }

    #[test]
    fn test_shutdown_wakes_and_sticks() {
        let shared = SharedState::new(test_dashboard());
        shared.request_shutdown();
        assert!(shared.is_shutdown());
        assert!(shared.wait_for_tick(Duration::from_secs(5)));
        assert!(shared.wait_for_tick(Duration::from_secs(5)));
    }

    #[test]
    fn test_exclusive_flag() {
        let shared = SharedState::new(test_dashboard());
        assert!(!shared.awaiting_input());
        shared.begin_exclusive();
        assert!(shared.awaiting_input());
        shared.end_exclusive();
        assert!(!shared.awaiting_input());
    }

    #[test]
    fn test_with_does_not_request_redraw() {
        let shared = SharedState::new(test_dashboard());
        shared.with(|d| d.show_help = true);
        assert!(!shared.with(|d| d.redraw_requested));
    }
}
