//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use ratatui::buffer::Buffer;

use crate::core::clock::Clock;
use crate::core::state::{Dashboard, Snapshot};
use crate::tui::components::PromptView;
use crate::tui::event::{EventSource, TuiEvent};
use crate::tui::surface::Surface;

/// 2026-03-01 10:15:30 UTC, a Sunday.
pub fn test_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T10:15:30Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Default dashboard in UTC with no secondary zones, evaluated at `test_now()`.
pub fn test_dashboard() -> Dashboard {
    Dashboard::new(Tz::UTC, test_now())
}

/// Unique per test name and process.
pub fn temp_config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tempo-test-{name}-{}.toml", std::process::id()))
}

/// All cell symbols, row after row.
pub fn buffer_text(buffer: &Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

/// The keys for typing `line` and pressing Enter.
pub fn typed(line: &str) -> Vec<TuiEvent> {
    line.chars()
        .map(TuiEvent::InputChar)
        .chain(std::iter::once(TuiEvent::Submit))
        .collect()
}

// ============================================================================
// ManualClock
// ============================================================================

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// ScriptedEvents
// ============================================================================

/// Hands out a fixed list of events, then fails like a closed terminal.
pub struct ScriptedEvents {
    events: VecDeque<TuiEvent>,
}

impl ScriptedEvents {
    pub fn new(events: Vec<TuiEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<TuiEvent>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script exhausted",
            )),
        }
    }
}

// ============================================================================
// RecordingSurface
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Dashboard(Snapshot),
    Prompt(PromptView),
    Clear,
    Bell,
}

/// Remembers everything written to it. `fail_draws` makes dashboard draws
/// fail the way a resize race does.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    pub fail_draws: bool,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.clone()
    }
}

impl Surface for RecordingSurface {
    fn draw_dashboard(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if self.fail_draws {
            return Err(io::Error::other("terminal went away"));
        }
        self.calls.push(SurfaceCall::Dashboard(snapshot.clone()));
        Ok(())
    }

    fn draw_prompt(&mut self, prompt: &PromptView) -> io::Result<()> {
        self.calls.push(SurfaceCall::Prompt(prompt.clone()));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(SurfaceCall::Clear);
        Ok(())
    }

    fn bell(&mut self) -> io::Result<()> {
        self.calls.push(SurfaceCall::Bell);
        Ok(())
    }
}
