//! # HelpPanel Component
//!
//! Full-screen command reference, toggled with `H`. A bare Enter hides it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Row, Table};

use crate::tui::component::Component;

/// (section, color, [(key, description)])
const SECTIONS: &[(&str, Color, &[(&str, &str)])] = &[
    (
        "Countdown Timer (Pomodoro)",
        Color::Magenta,
        &[
            ("P", "Pause/resume the countdown timer."),
            ("R", "Reset the countdown timer to its full duration."),
            ("T", "Change the timer duration (minutes)."),
            ("B", "Start a break once the countdown is complete."),
        ],
    ),
    (
        "Stopwatch",
        Color::Green,
        &[
            ("S", "Start or stop the stopwatch."),
            ("W", "Reset the stopwatch to zero (while stopped)."),
        ],
    ),
    (
        "Alarm Clock",
        Color::Blue,
        &[("A", "Set a new alarm (HH:MM) / silence a ringing alarm.")],
    ),
    (
        "Configuration & Clock",
        Color::Cyan,
        &[
            ("Z", "Change the main time zone."),
            ("F", "Toggle 12-hour (AM/PM) / 24-hour time."),
            ("H", "Show/hide this help screen."),
            ("Q", "Quit and save the configuration."),
        ],
    ),
];

#[derive(Default)]
pub struct HelpPanel;

impl HelpPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for HelpPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut rows = Vec::new();
        for (index, (section, color, commands)) in SECTIONS.iter().enumerate() {
            if index > 0 {
                rows.push(Row::new(vec![""]));
            }
            rows.push(Row::new(vec![Span::styled(
                *section,
                Style::default()
                    .fg(*color)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )]));
            for (key, description) in commands.iter() {
                rows.push(Row::new(vec![
                    Span::styled(
                        format!("{key} + ENTER"),
                        Style::default().fg(*color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*description),
                ]));
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(
                " Application Controls & Instructions ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(" Press ENTER to resume the clock ").centered());

        let table = Table::new(rows, [Constraint::Length(28), Constraint::Fill(1)])
            .column_spacing(2)
            .block(block);
        frame.render_widget(table, area);
    }
}
