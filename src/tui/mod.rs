//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, runs the two loops, and
//! translates keys into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Threads
//!
//! ```text
//!  main thread                          tempo-input thread
//!  ───────────                          ──────────────────
//!  Renderer::run()                      InputHandler::run()
//!    tick → draw                          key → update() → notify
//!    wait_for_tick() ◄──── Condvar ────── prompt: ExclusiveTerminal
//!         │                                      │
//!         └──────── Arc<SharedState> ────────────┘
//!         └──────── Arc<Mutex<TerminalSurface>> ─┘
//! ```
//!
//! Shutdown: either side sets `should_quit`; the renderer wakes, returns,
//! the input thread is joined (it polls every 100ms), the terminal is
//! restored and the final save happens.
//!
//! Only prompts show the cursor, parked after the typed answer. Its shape is
//! set once at startup and put back to the user's default on exit.

mod component;
pub mod components;
pub mod event;
pub mod input;
pub mod renderer;
pub mod surface;
mod ui;

use std::io::{self, stdout};
use std::sync::{Arc, Mutex};
use std::thread;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{info, warn};

use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{ConfigStore, ResolvedConfig};
use crate::core::shared::SharedState;
use crate::core::state::Dashboard;
use crate::tui::event::CrosstermEvents;
use crate::tui::input::InputHandler;
use crate::tui::renderer::{RenderSettings, Renderer};
use crate::tui::surface::TerminalSurface;

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Lets a lone Esc arrive without waiting for an escape sequence.
        // Terminals without the protocol ignore it.
        execute!(
            stdout(),
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Requests shutdown when the input thread ends for any reason, panics
/// included, so the renderer never waits on a dead loop.
struct ShutdownOnExit(Arc<SharedState>);

impl Drop for ShutdownOnExit {
    fn drop(&mut self) {
        self.0.request_shutdown();
    }
}

pub fn run(config: ResolvedConfig, store: ConfigStore) -> io::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let shared = Arc::new(SharedState::new(Dashboard::from_config(&config, clock.now())));
    let store = Arc::new(store);
    let settings = RenderSettings::from_config(&config);

    // The only fatal error: nothing has started yet
    let terminal = ratatui::try_init()?;
    let mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to set terminal modes: {}", e))
        .ok();
    let surface = Arc::new(Mutex::new(TerminalSurface::new(terminal)));

    let spawned = thread::Builder::new().name("tempo-input".to_string()).spawn({
        let shared = Arc::clone(&shared);
        let clock = Arc::clone(&clock);
        let surface = Arc::clone(&surface);
        let store = Arc::clone(&store);
        move || {
            let _shutdown = ShutdownOnExit(Arc::clone(&shared));
            InputHandler::new(shared, clock, CrosstermEvents, surface, store).run();
        }
    });
    let input = match spawned {
        Ok(handle) => handle,
        Err(e) => {
            drop(mode_guard);
            ratatui::restore();
            return Err(e);
        }
    };

    Renderer::new(Arc::clone(&shared), Arc::clone(&clock), surface, settings).run();

    if input.join().is_err() {
        warn!("Input thread panicked");
    }
    drop(mode_guard);
    ratatui::restore();

    let now = clock.now();
    let dashboard = shared.with(|d| {
        d.advance_to(now);
        d.clone()
    });
    store.save(&dashboard, now);
    info!("Shutdown complete");
    Ok(())
}
