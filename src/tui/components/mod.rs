//! # TUI Components
//!
//! The panels a dashboard frame is built from.
//!
//! ## Component Architecture
//!
//! Every panel is a stateless, props-based component: it is created for one
//! frame from fields of a `Snapshot` and implements `Component::render`.
//!
//! - `StatusBar`: header line (status message, ringing alarm)
//! - `MainClock`: big clock in the main zone, date, alarm state
//! - `ZoneList`: secondary zones
//! - `PomodoroPanel` / `StopwatchPanel`: the two counters
//! - `CommandLine`: keys typed so far + focus statistics
//! - `HelpPanel`: command reference, replaces the dashboard while shown
//! - `PromptPanel`: the interactive question, drawn by the input loop
//!
//! Props are plain values, never the shared state:
//!
//! ```rust,ignore
//! // Good: the frame only sees a copy
//! MainClock::new(snapshot.now, snapshot.main_zone, ...).render(frame, area);
//!
//! // Bad: drawing could change what it draws
//! MainClock::new(&shared).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (header)
//! ├── clock_panel.rs   (main clock + other zones)
//! ├── timer_panel.rs   (pomodoro + stopwatch)
//! ├── command_line.rs  (typed command + stats)
//! ├── help_panel.rs    (command reference)
//! └── prompt.rs        (interactive prompt)
//! ```

mod clock_panel;
mod command_line;
mod help_panel;
mod prompt;
mod status_bar;
mod timer_panel;

pub use clock_panel::{MainClock, ZoneList};
pub use command_line::CommandLine;
pub use help_panel::HelpPanel;
pub use prompt::{PromptPanel, PromptView};
pub use status_bar::StatusBar;
pub use timer_panel::{PomodoroPanel, StopwatchPanel};
