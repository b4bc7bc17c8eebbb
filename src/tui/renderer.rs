//! # Renderer
//!
//! The foreground loop. Each tick it advances the timers to "now", takes a
//! snapshot, and draws it, unless the input loop owns the terminal.
//!
//! ```text
//!  ┌──────────── tick ─────────────┐
//!  │ with(): advance_to(now)       │
//!  │         snapshot(now)         │
//!  │ awaiting_input? ── yes ─► skip│
//!  │ surface.try_lock() ─ busy ─► skip
//!  │ with(): re-check, take_events │
//!  │ bell? draw_dashboard()        │
//!  └───────────────────────────────┘
//!        │
//!        ▼
//!  wait_for_tick(pacer.wait_time())   // woken early by updates/shutdown
//! ```
//!
//! Timers keep advancing while a prompt is open; only drawing and bells are
//! held back. Edges seen in the meantime stay queued in `pending_events`
//! and are surfaced on the first draw after the prompt closes.

use std::sync::{Arc, Mutex, TryLockError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::core::clock::Clock;
use crate::core::config::ResolvedConfig;
use crate::core::shared::SharedState;
use crate::tui::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub refresh_per_second: u32,
    /// Minimum gap between bells while the alarm rings. Zero = every tick.
    pub bell_interval: Duration,
}

impl RenderSettings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            refresh_per_second: config.refresh_per_second,
            bell_interval: config.bell_interval,
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_per_second.max(1)
    }
}

// ============================================================================
// Pacing
// ============================================================================

/// Keeps ticks on a fixed grid so a slow frame doesn't push every later
/// frame back. Missed slots are skipped, not replayed.
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    next: Instant,
}

impl Pacer {
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: start + period,
        }
    }

    /// How long to sleep from `now` until the next slot.
    pub fn wait_time(&mut self, now: Instant) -> Duration {
        if self.next <= now {
            // Land on the first grid slot after `now`, however far behind
            let behind = now - self.next;
            let into_slot = behind.as_nanos() % self.period.as_nanos();
            let into_slot = Duration::from_nanos(u64::try_from(into_slot).unwrap_or(0));
            self.next = now + (self.period - into_slot);
        }
        self.next - now
    }
}

/// Rings on the first tick of a ringing alarm, then at most once per
/// interval until it stops.
#[derive(Debug)]
pub struct BellThrottle {
    interval: Duration,
    last: Option<DateTime<Utc>>,
}

impl BellThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn should_ring(&mut self, ringing: bool, now: DateTime<Utc>) -> bool {
        if !ringing {
            self.last = None;
            return false;
        }
        let due = match self.last {
            None => true,
            Some(last) => (now - last).to_std().unwrap_or(Duration::ZERO) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Drawn,
    /// The input loop owns the terminal.
    SkippedPrompt,
    /// Someone else holds the surface right now.
    SkippedBusy,
}

pub struct Renderer<S: Surface> {
    shared: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    surface: Arc<Mutex<S>>,
    settings: RenderSettings,
    bell: BellThrottle,
}

impl<S: Surface> Renderer<S> {
    pub fn new(
        shared: Arc<SharedState>,
        clock: Arc<dyn Clock>,
        surface: Arc<Mutex<S>>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            shared,
            clock,
            surface,
            bell: BellThrottle::new(settings.bell_interval),
            settings,
        }
    }

    /// Ticks until shutdown is requested.
    pub fn run(&mut self) {
        info!(
            "Renderer started ({} frames per second)",
            self.settings.refresh_per_second
        );
        let mut pacer = Pacer::new(self.settings.frame_period(), Instant::now());
        while !self.shared.is_shutdown() {
            self.tick();
            self.shared.wait_for_tick(pacer.wait_time(Instant::now()));
        }
        info!("Renderer stopped");
    }

    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let (snapshot, awaiting) = self.shared.with(|d| {
            d.advance_to(now);
            (d.snapshot(now), d.awaiting_input)
        });
        if awaiting {
            return TickOutcome::SkippedPrompt;
        }

        let mut surface = match self.surface.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!("Surface busy, skipping frame");
                return TickOutcome::SkippedBusy;
            }
        };

        // A prompt may have started between the snapshot and the lock
        let events = self.shared.with(|d| {
            if d.awaiting_input {
                None
            } else {
                Some(d.take_events())
            }
        });
        let Some(events) = events else {
            return TickOutcome::SkippedPrompt;
        };

        let alarm_bell = self.bell.should_ring(snapshot.timers.alarm.ringing, now);
        if events.timer_expired {
            info!("Pomodoro complete");
        }
        if events.alarm_triggered {
            info!("Alarm ringing");
        }
        if (events.timer_expired || alarm_bell)
            && let Err(e) = surface.bell()
        {
            warn!("Bell failed: {}", e);
        }

        if let Err(e) = surface.draw_dashboard(&snapshot) {
            warn!("Draw failed: {}", e);
        }
        TickOutcome::Drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        ManualClock, RecordingSurface, SurfaceCall, test_dashboard, test_now,
    };
    use chrono::{NaiveTime, TimeDelta};

    struct Fixture {
        shared: Arc<SharedState>,
        clock: Arc<ManualClock>,
        surface: Arc<Mutex<RecordingSurface>>,
        renderer: Renderer<RecordingSurface>,
    }

    fn fixture(bell_interval: Duration) -> Fixture {
        let shared = Arc::new(SharedState::new(test_dashboard()));
        let clock = Arc::new(ManualClock::new(test_now()));
        let surface = Arc::new(Mutex::new(RecordingSurface::default()));
        let renderer = Renderer::new(
            Arc::clone(&shared),
            clock.clone(),
            Arc::clone(&surface),
            RenderSettings {
                refresh_per_second: 4,
                bell_interval,
            },
        );
        Fixture {
            shared,
            clock,
            surface,
            renderer,
        }
    }

    fn bells(surface: &Mutex<RecordingSurface>) -> usize {
        surface
            .lock()
            .unwrap()
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Bell))
            .count()
    }

    #[test]
    fn test_frame_period() {
        let settings = RenderSettings {
            refresh_per_second: 8,
            bell_interval: Duration::ZERO,
        };
        assert_eq!(settings.frame_period(), Duration::from_millis(125));
        let zero = RenderSettings {
            refresh_per_second: 0,
            bell_interval: Duration::ZERO,
        };
        assert_eq!(zero.frame_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_pacer_stays_on_grid() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut pacer = Pacer::new(ms(100), start);

        assert_eq!(pacer.wait_time(start), ms(100));
        // Woken early: same slot
        assert_eq!(pacer.wait_time(start + ms(40)), ms(60));
        // On the slot: next one
        assert_eq!(pacer.wait_time(start + ms(100)), ms(100));
        // A slow frame is absorbed
        assert_eq!(pacer.wait_time(start + ms(130)), ms(70));
        // Far behind: missed slots are skipped
        assert_eq!(pacer.wait_time(start + ms(450)), ms(50));
    }

    #[test]
    fn test_pacer_survives_a_long_stall() {
        let start = Instant::now();
        let period = Duration::from_millis(1);
        let mut pacer = Pacer::new(period, start);

        // Far more missed slots than fit in a u32
        let stalled = start + Duration::from_secs(60 * 24 * 60 * 60) + Duration::from_micros(250);
        assert_eq!(pacer.wait_time(stalled), Duration::from_micros(750));
        // Back on the grid afterwards
        let next = stalled + Duration::from_micros(750);
        assert_eq!(pacer.wait_time(next), period);
    }

    #[test]
    fn test_bell_throttle() {
        let t0 = test_now();
        let mut throttle = BellThrottle::new(Duration::from_secs(1));

        assert!(!throttle.should_ring(false, t0));
        assert!(throttle.should_ring(true, t0));
        assert!(!throttle.should_ring(true, t0 + TimeDelta::milliseconds(500)));
        assert!(throttle.should_ring(true, t0 + TimeDelta::milliseconds(1000)));
        // Stopping resets: the next ring is immediate
        assert!(!throttle.should_ring(false, t0 + TimeDelta::milliseconds(1100)));
        assert!(throttle.should_ring(true, t0 + TimeDelta::milliseconds(1200)));
    }

    #[test]
    fn test_zero_interval_rings_every_tick() {
        let t0 = test_now();
        let mut throttle = BellThrottle::new(Duration::ZERO);
        assert!(throttle.should_ring(true, t0));
        assert!(throttle.should_ring(true, t0));
    }

    #[test]
    fn test_tick_draws_current_time() {
        let mut f = fixture(Duration::from_secs(1));
        f.shared.with(|d| d.timers.stopwatch.running = true);
        f.clock.advance(TimeDelta::seconds(3));

        assert_eq!(f.renderer.tick(), TickOutcome::Drawn);

        let calls = f.surface.lock().unwrap().calls();
        let [SurfaceCall::Dashboard(snapshot)] = calls.as_slice() else {
            panic!("expected one dashboard frame, got {calls:?}");
        };
        assert_eq!(snapshot.now, test_now() + TimeDelta::seconds(3));
        assert_eq!(snapshot.timers.stopwatch.elapsed, Duration::from_secs(3));
    }

    #[test]
    fn test_tick_skipped_while_prompt_open_but_timers_advance() {
        let mut f = fixture(Duration::from_secs(1));
        f.shared.with(|d| d.timers.stopwatch.running = true);
        f.shared.begin_exclusive();
        f.clock.advance(TimeDelta::seconds(5));

        assert_eq!(f.renderer.tick(), TickOutcome::SkippedPrompt);
        assert!(f.surface.lock().unwrap().calls().is_empty());
        assert_eq!(
            f.shared.with(|d| d.timers.stopwatch.elapsed),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_tick_skipped_while_surface_busy() {
        let mut f = fixture(Duration::from_secs(1));
        let surface = Arc::clone(&f.surface);
        let guard = surface.lock().unwrap();
        assert_eq!(f.renderer.tick(), TickOutcome::SkippedBusy);
        drop(guard);
        assert_eq!(f.renderer.tick(), TickOutcome::Drawn);
    }

    #[test]
    fn test_draw_failure_is_swallowed() {
        let mut f = fixture(Duration::from_secs(1));
        f.surface.lock().unwrap().fail_draws = true;
        assert_eq!(f.renderer.tick(), TickOutcome::Drawn);
        f.surface.lock().unwrap().fail_draws = false;
        assert_eq!(f.renderer.tick(), TickOutcome::Drawn);
        assert_eq!(f.surface.lock().unwrap().calls().len(), 1);
    }

    #[test]
    fn test_expiry_rings_once() {
        let mut f = fixture(Duration::from_secs(1));
        f.shared.with(|d| {
            d.timers.pomodoro.paused = false;
            d.timers.pomodoro.remaining = Duration::from_secs(1);
        });
        f.clock.advance(TimeDelta::seconds(2));
        f.renderer.tick();
        f.clock.advance(TimeDelta::seconds(2));
        f.renderer.tick();

        assert_eq!(bells(&f.surface), 1);
        assert_eq!(f.shared.with(|d| d.timers.pomodoro.completed_sessions), 1);
    }

    #[test]
    fn test_expiry_during_prompt_rings_after_it_closes() {
        let mut f = fixture(Duration::from_secs(1));
        f.shared.with(|d| {
            d.timers.pomodoro.paused = false;
            d.timers.pomodoro.remaining = Duration::from_secs(1);
        });
        f.shared.begin_exclusive();
        f.clock.advance(TimeDelta::seconds(2));
        f.renderer.tick();
        assert_eq!(bells(&f.surface), 0);

        f.shared.end_exclusive();
        f.renderer.tick();
        assert_eq!(bells(&f.surface), 1);
    }

    #[test]
    fn test_ringing_alarm_bell_is_throttled() {
        let mut f = fixture(Duration::from_secs(1));
        // test_now() is 10:15:30 UTC
        f.shared
            .with(|d| d.timers.alarm.set(NaiveTime::from_hms_opt(10, 16, 0)));
        f.renderer.tick();
        assert_eq!(bells(&f.surface), 0);

        f.clock.advance(TimeDelta::seconds(30));
        for _ in 0..8 {
            f.renderer.tick();
            f.clock.advance(TimeDelta::milliseconds(250));
        }
        // 0ms, 1000ms
        assert_eq!(bells(&f.surface), 2);
        assert!(f.shared.with(|d| d.timers.alarm.ringing));
    }
}
