//! # StatusBar Component
//!
//! Header panel across the top of the dashboard.
//!
//! ## Conditional Formatting
//!
//! 1. **Alarm ringing**: `"ALARM! Press 'A' + Enter to silence."` in red
//! 2. **Status message**: result of the last command (or the startup line)
//! 3. **Default**: `"Main Zone: Europe/Paris | Pomodoro Timer: 25 min. ..."`
//!
//! A ringing alarm wins over everything else so it can't be missed.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

pub struct StatusBar {
    pub status_message: String,
    pub main_zone: String,
    pub duration_minutes: u32,
    pub alarm_ringing: bool,
}

impl StatusBar {
    pub fn new(
        status_message: String,
        main_zone: String,
        duration_minutes: u32,
        alarm_ringing: bool,
    ) -> Self {
        Self {
            status_message,
            main_zone,
            duration_minutes,
            alarm_ringing,
        }
    }

    fn text_and_style(&self) -> (String, Style) {
        if self.alarm_ringing {
            (
                "ALARM! Press 'A' + Enter to silence.".to_string(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else if !self.status_message.is_empty() {
            (self.status_message.clone(), Style::default().fg(Color::White))
        } else {
            (
                format!(
                    "Main Zone: {} | Pomodoro Timer: {} min. Press 'H' + Enter for help.",
                    self.main_zone, self.duration_minutes
                ),
                Style::default().add_modifier(Modifier::DIM),
            )
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (text, style) = self.text_and_style();
        let block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Status ")
            .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        let paragraph = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(bar: &mut StatusBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 3)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_status_message_shown() {
        let mut bar = StatusBar::new("Timer reset.".to_string(), "UTC".to_string(), 25, false);
        let text = render(&mut bar);
        assert!(text.contains("Status"));
        assert!(text.contains("Timer reset."));
    }

    #[test]
    fn test_default_text_without_message() {
        let mut bar = StatusBar::new(String::new(), "Europe/Paris".to_string(), 30, false);
        let text = render(&mut bar);
        assert!(text.contains("Main Zone: Europe/Paris"));
        assert!(text.contains("30 min"));
    }

    #[test]
    fn test_ringing_alarm_wins() {
        let mut bar = StatusBar::new("Timer reset.".to_string(), "UTC".to_string(), 25, true);
        let text = render(&mut bar);
        assert!(text.contains("ALARM!"));
        assert!(!text.contains("Timer reset."));
    }
}
