//! # Input Handler
//!
//! The background loop. Collects keys into a command line, dispatches it on
//! Enter, and runs the interactive prompts (T, A, Z) with the terminal to
//! itself.
//!
//! ```text
//!            key               Enter                T / A / Z
//!  Idle ───────────► AwaitingCommand ──► dispatch ─────────────► RunningPrompt(kind)
//!   ▲                                       │                          │ answer / cancel
//!   │                                       │ other letters            ▼
//!   └───────────────────────────────────────┴─────────────────── ApplyingResult
//! ```
//!
//! ## Exclusive access
//!
//! A prompt holds an `ExclusiveTerminal` from the moment it starts until its
//! result is applied:
//!
//! 1. `awaiting_input = true` (the renderer stops drawing)
//! 2. lock the surface (waits out a frame already being drawn)
//! 3. clear the screen
//! 4. ask, validate, re-ask
//! 5. apply the result (or the cancel message)
//! 6. drop: release the surface, then `awaiting_input = false`
//!
//! Step 6 runs on every exit path, including an input error mid-prompt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::clock::Clock;
use crate::core::command::{Command, PromptKind};
use crate::core::config::{ALARM_TIME_FORMAT, ConfigStore};
use crate::core::shared::SharedState;
use crate::core::state::Dashboard;
use crate::tui::components::PromptView;
use crate::tui::event::{EventSource, TuiEvent};
use crate::tui::surface::Surface;

/// How often the loop looks up from the keyboard to check for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Idle,
    AwaitingCommand,
    RunningPrompt(PromptKind),
    ApplyingResult,
}

// ============================================================================
// Exclusive terminal guard
// ============================================================================

struct ExclusiveFlag<'a>(&'a SharedState);

impl Drop for ExclusiveFlag<'_> {
    fn drop(&mut self) {
        self.0.end_exclusive();
    }
}

/// Sole ownership of the terminal for the duration of a prompt.
pub struct ExclusiveTerminal<'a, S: Surface> {
    // Fields drop in order: the surface is released before the flag clears.
    surface: MutexGuard<'a, S>,
    _flag: ExclusiveFlag<'a>,
}

impl<'a, S: Surface> ExclusiveTerminal<'a, S> {
    pub fn acquire(shared: &'a SharedState, surface: &'a Mutex<S>) -> Self {
        shared.begin_exclusive();
        let flag = ExclusiveFlag(shared);
        let mut surface = surface.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = surface.clear() {
            warn!("Failed to clear screen for prompt: {}", e);
        }
        Self {
            surface,
            _flag: flag,
        }
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }
}

// ============================================================================
// Handler
// ============================================================================

pub struct InputHandler<E: EventSource, S: Surface> {
    shared: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    events: E,
    surface: Arc<Mutex<S>>,
    store: Arc<ConfigStore>,
    phase: InputPhase,
}

impl<E: EventSource, S: Surface> InputHandler<E, S> {
    pub fn new(
        shared: Arc<SharedState>,
        clock: Arc<dyn Clock>,
        events: E,
        surface: Arc<Mutex<S>>,
        store: Arc<ConfigStore>,
    ) -> Self {
        Self {
            shared,
            clock,
            events,
            surface,
            store,
            phase: InputPhase::Idle,
        }
    }

    pub fn phase(&self) -> InputPhase {
        self.phase
    }

    /// Reads keys until shutdown. An unreadable terminal shuts everything down.
    pub fn run(&mut self) {
        info!("Input loop started");
        while !self.shared.is_shutdown() {
            match self.events.next_event(POLL_INTERVAL) {
                Ok(Some(event)) => self.handle_event(event),
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to read input, shutting down: {}", e);
                    self.shared.request_shutdown();
                }
            }
        }
        info!("Input loop stopped");
    }

    fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::InputChar(c) => {
                self.shared.update(|d| d.command_buffer.push(c));
                self.phase = InputPhase::AwaitingCommand;
            }
            TuiEvent::Backspace => {
                let empty = self.shared.update(|d| {
                    d.command_buffer.pop();
                    d.command_buffer.is_empty()
                });
                if empty {
                    self.phase = InputPhase::Idle;
                }
            }
            TuiEvent::Escape => {
                self.shared.update(|d| d.command_buffer.clear());
                self.phase = InputPhase::Idle;
            }
            TuiEvent::Submit => {
                let line = self.shared.update(|d| std::mem::take(&mut d.command_buffer));
                self.dispatch(&line);
                self.phase = InputPhase::Idle;
            }
            TuiEvent::ForceQuit => {
                info!("Ctrl+C received");
                self.shared.request_shutdown();
            }
            TuiEvent::Resize => {
                self.shared.update(|_| {});
            }
        }
    }

    fn dispatch(&mut self, line: &str) {
        let Some(command) = Command::parse(line) else {
            if line.trim().is_empty() {
                self.apply(Action::DismissHelp);
            } else {
                debug!("Ignoring unknown command {:?}", line);
            }
            return;
        };
        info!("Command: {:?}", command);

        match command {
            Command::ChangeZone => self.run_prompt(PromptKind::Zone),
            Command::ToggleFormat => self.apply(Action::ToggleTimeFormat),
            Command::TogglePause => self.apply(Action::TogglePause),
            Command::ResetTimer => self.apply(Action::ResetTimer),
            Command::SetDuration => self.run_prompt(PromptKind::Duration),
            Command::StartBreak => self.apply(Action::StartBreak),
            Command::ToggleStopwatch => self.apply(Action::ToggleStopwatch),
            Command::ResetStopwatch => self.apply(Action::ResetStopwatch),
            Command::Alarm => {
                let now = self.clock.now();
                let ringing = self.shared.with(|d| {
                    d.advance_to(now);
                    d.timers.alarm.ringing
                });
                if ringing {
                    self.apply(Action::SilenceAlarm);
                } else {
                    self.run_prompt(PromptKind::Alarm);
                }
            }
            Command::Help => self.apply(Action::ToggleHelp),
            Command::Quit => self.apply(Action::Quit),
        }
    }

    fn apply(&mut self, action: Action) {
        let now = self.clock.now();
        let effect = self.shared.update(|d| update(d, action, now));
        match effect {
            Effect::None => {}
            Effect::SaveConfig => {
                let dashboard = self.shared.with(|d| d.clone());
                self.store.save(&dashboard, now);
            }
            Effect::Quit => info!("Quit requested"),
        }
    }

    // ========================================================================
    // Prompts
    // ========================================================================

    fn run_prompt(&mut self, kind: PromptKind) {
        debug!("Prompt: {:?}", kind);
        self.phase = InputPhase::RunningPrompt(kind);

        let shared = Arc::clone(&self.shared);
        let surface = Arc::clone(&self.surface);
        let mut terminal = ExclusiveTerminal::acquire(&shared, &surface);

        let context = shared.with(|d| prompt_context(kind, d));
        let answer = self.read_prompt(kind, context, &mut terminal);

        self.phase = InputPhase::ApplyingResult;
        match answer {
            Some(action) => self.apply(action),
            None => {
                debug!("Prompt {:?} cancelled", kind);
                shared.update(|d| d.status_message = kind.cancel_message().to_string());
            }
        }
        drop(terminal);
    }

    /// Asks until the answer parses. `None` = cancelled.
    fn read_prompt(
        &mut self,
        kind: PromptKind,
        context: String,
        terminal: &mut ExclusiveTerminal<'_, S>,
    ) -> Option<Action> {
        let mut view = PromptView::new(kind, context);
        let mut dirty = true;
        loop {
            if self.shared.is_shutdown() {
                return None;
            }
            if dirty {
                if let Err(e) = terminal.surface().draw_prompt(&view) {
                    warn!("Failed to draw prompt: {}", e);
                }
                dirty = false;
            }

            let event = match self.events.next_event(POLL_INTERVAL) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Failed to read prompt input: {}", e);
                    return None;
                }
            };

            dirty = true;
            match event {
                TuiEvent::InputChar(c) => view.input.push(c),
                TuiEvent::Backspace => {
                    view.input.pop();
                }
                TuiEvent::Escape => return None,
                TuiEvent::ForceQuit => {
                    self.shared.request_shutdown();
                    return None;
                }
                TuiEvent::Resize => {}
                TuiEvent::Submit => match kind.parse_answer(&view.input) {
                    Ok(answer) => return answer,
                    Err(e) => {
                        debug!("Rejected answer: {}", e);
                        view.error = Some(e.to_string());
                        view.input.clear();
                    }
                },
            }
        }
    }
}

fn prompt_context(kind: PromptKind, dashboard: &Dashboard) -> String {
    let zone = dashboard.main_zone.name();
    match kind {
        PromptKind::Duration => format!(
            "Current duration: {} min",
            dashboard.timers.pomodoro.duration_minutes
        ),
        PromptKind::Alarm => match dashboard.timers.alarm.time {
            Some(time) => format!(
                "Current alarm: {} ({zone})",
                time.format(ALARM_TIME_FORMAT)
            ),
            None => format!("No alarm set. Times are in {zone}."),
        },
        PromptKind::Zone => format!("Current main zone: {zone}"),
    }
}
