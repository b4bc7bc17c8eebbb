use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::timer::format_duration;
use crate::tui::component::Component;

/// Bottom line: what has been typed so far, and the focus tally.
pub struct CommandLine {
    pub buffer: String,
    pub completed_sessions: u32,
    pub total_focus: Duration,
}

impl CommandLine {
    pub fn new(buffer: String, completed_sessions: u32, total_focus: Duration) -> Self {
        Self {
            buffer,
            completed_sessions,
            total_focus,
        }
    }
}

impl Component for CommandLine {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let stats = format!(
            "Focus: {} session{} | {} ",
            self.completed_sessions,
            if self.completed_sessions == 1 { "" } else { "s" },
            format_duration(self.total_focus)
        );
        let [input_area, stats_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(stats.len() as u16)])
                .areas(area);

        let prompt = if self.buffer.is_empty() {
            Line::from(vec![
                Span::styled(" > ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    "type a command + Enter (H for help)",
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled(" > ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    self.buffer.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        };

        frame.render_widget(Paragraph::new(prompt), input_area);
        frame.render_widget(
            Paragraph::new(stats).style(Style::default().fg(Color::Cyan)),
            stats_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(line: &mut CommandLine) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| line.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_hint_when_empty() {
        let text = render(&mut CommandLine::new(String::new(), 0, Duration::ZERO));
        assert!(text.contains("H for help"));
        assert!(text.contains("Focus: 0 sessions | 00:00"));
    }

    #[test]
    fn test_echoes_buffer_and_stats() {
        let text = render(&mut CommandLine::new(
            "t".to_string(),
            2,
            Duration::from_secs(50 * 60),
        ));
        assert!(text.contains("> t"));
        assert!(!text.contains("H for help"));
        assert!(text.contains("Focus: 2 sessions | 50:00"));
    }

    #[test]
    fn test_singular_session() {
        let text = render(&mut CommandLine::new(String::new(), 1, Duration::from_secs(1_500)));
        assert!(text.contains("1 session |"));
    }
}
