//! # Surface
//!
//! The terminal as the two loops see it. Exactly one of them may write to
//! it at a time: the surface sits behind a `Mutex`, the renderer only ever
//! `try_lock`s it, and the input loop holds it for a whole prompt.
//!
//! Drawing is idempotent: the same snapshot always produces the same frame,
//! and nothing here can reach back into the shared state.

use std::io::{self, Write};

use ratatui::DefaultTerminal;

use crate::core::state::Snapshot;
use crate::tui::components::PromptView;
use crate::tui::ui;

pub trait Surface: Send {
    /// One full dashboard frame.
    fn draw_dashboard(&mut self, snapshot: &Snapshot) -> io::Result<()>;
    /// One full prompt frame.
    fn draw_prompt(&mut self, prompt: &PromptView) -> io::Result<()>;
    /// Wipes the screen so no stale dashboard shows behind a prompt.
    fn clear(&mut self) -> io::Result<()>;
    /// Terminal bell.
    fn bell(&mut self) -> io::Result<()>;
}

/// The real terminal.
pub struct TerminalSurface {
    terminal: DefaultTerminal,
}

impl TerminalSurface {
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self { terminal }
    }
}

impl Surface for TerminalSurface {
    fn draw_dashboard(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.terminal.draw(|f| ui::draw_dashboard(f, snapshot))?;
        Ok(())
    }

    fn draw_prompt(&mut self, prompt: &PromptView) -> io::Result<()> {
        self.terminal.draw(|f| ui::draw_prompt(f, prompt))?;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }

    fn bell(&mut self) -> io::Result<()> {
        let backend = self.terminal.backend_mut();
        backend.write_all(b"\x07")?;
        backend.flush()
    }
}
