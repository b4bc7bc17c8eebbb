use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, LineGauge, Paragraph};

use crate::core::timer::{Phase, Pomodoro, Stopwatch, format_duration};
use crate::tui::component::Component;

/// Pomodoro countdown panel: time left, status, a progress line for the
/// current phase and the configured lengths.
pub struct PomodoroPanel {
    pub pomodoro: Pomodoro,
}

impl PomodoroPanel {
    pub fn new(pomodoro: Pomodoro) -> Self {
        Self { pomodoro }
    }

    fn accent(&self) -> Color {
        match self.pomodoro.phase {
            Phase::Work => Color::Magenta,
            Phase::Break => Color::Green,
        }
    }

    fn time_and_status(&self) -> (Span<'static>, Span<'static>) {
        let pomodoro = &self.pomodoro;
        if pomodoro.is_expired() {
            let status = match pomodoro.phase {
                Phase::Work => "COMPLETE (B for a break, R to reset)",
                Phase::Break => "BREAK OVER (R to reset)",
            };
            return (
                Span::styled("00:00", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(
                    status,
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                ),
            );
        }

        let (label, color) = match (pomodoro.phase, pomodoro.paused) {
            (Phase::Work, true) => ("PAUSED", Color::Yellow),
            (Phase::Work, false) => ("RUNNING", Color::Magenta),
            (Phase::Break, true) => ("BREAK PAUSED", Color::Yellow),
            (Phase::Break, false) => ("ON BREAK", Color::Green),
        };
        (
            Span::styled(
                format_duration(pomodoro.remaining),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{label} (P to toggle, R to reset)"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        )
    }

    /// `" 40% 10:00/25:00"`
    fn progress_label(&self) -> String {
        let full = self.pomodoro.full();
        let done = full.saturating_sub(self.pomodoro.remaining);
        let percent = (self.pomodoro.progress() * 100.0).floor() as u32;
        format!("{percent:>3}% {}/{}", format_duration(done), format_duration(full))
    }
}

impl Component for PomodoroPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let accent = self.accent();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(
                " COUNTDOWN (POMODORO) ",
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [time_area, status_area, gauge_area, lengths_area] =
            Layout::vertical([Constraint::Length(1); 4]).areas(inner);

        let (time, status) = self.time_and_status();
        frame.render_widget(Paragraph::new(Line::from(time)).alignment(Alignment::Center), time_area);
        frame.render_widget(
            Paragraph::new(Line::from(status)).alignment(Alignment::Center),
            status_area,
        );

        let gauge = LineGauge::default()
            .ratio(self.pomodoro.progress())
            .label(self.progress_label())
            .filled_style(Style::default().fg(accent))
            .unfilled_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(gauge, gauge_area.inner(Margin::new(2, 0)));

        let lengths = Line::from(Span::styled(
            format!(
                "(Focus: {} min | Break: {} min | T to change)",
                self.pomodoro.duration_minutes, self.pomodoro.break_minutes
            ),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::DIM),
        ));
        frame.render_widget(Paragraph::new(lengths).alignment(Alignment::Center), lengths_area);
    }
}

/// Stopwatch panel.
pub struct StopwatchPanel {
    pub stopwatch: Stopwatch,
}

impl StopwatchPanel {
    pub fn new(stopwatch: Stopwatch) -> Self {
        Self { stopwatch }
    }
}

impl Component for StopwatchPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let status = if self.stopwatch.running {
            Span::styled(
                "RUNNING (S to toggle, W to reset)",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "STOPPED (S to toggle, W to reset)",
                Style::default().fg(Color::White).add_modifier(Modifier::DIM),
            )
        };
        let lines = vec![
            Line::from(Span::styled(
                format_duration(self.stopwatch.elapsed),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(status),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green))
            .title(Span::styled(
                " STOPWATCH ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn render(component: &mut impl Component) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, 6)).unwrap();
        terminal.draw(|f| component.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_pomodoro_paused() {
        let text = render(&mut PomodoroPanel::new(Pomodoro::new(25)));
        assert!(text.contains("COUNTDOWN (POMODORO)"));
        assert!(text.contains("25:00"));
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Focus: 25 min | Break: 5 min"));
        assert!(text.contains("  0% 00:00/25:00"));
    }

    #[test]
    fn test_pomodoro_running_partial_second() {
        let mut pomodoro = Pomodoro::new(25);
        pomodoro.paused = false;
        pomodoro.remaining = Duration::from_millis(61_700);
        let text = render(&mut PomodoroPanel::new(pomodoro));
        assert!(text.contains("01:01"));
        assert!(text.contains("RUNNING"));
        // 1438.3 of 1500 seconds done
        assert!(text.contains(" 95% 23:58/25:00"));
    }

    #[test]
    fn test_pomodoro_expired() {
        let mut pomodoro = Pomodoro::new(25);
        pomodoro.remaining = Duration::ZERO;
        let text = render(&mut PomodoroPanel::new(pomodoro));
        assert!(text.contains("00:00"));
        assert!(text.contains("COMPLETE (B for a break"));
        assert!(text.contains("100% 25:00/25:00"));
    }

    #[test]
    fn test_pomodoro_break() {
        let mut pomodoro = Pomodoro::new(25);
        pomodoro.remaining = Duration::ZERO;
        assert!(pomodoro.start_break());
        pomodoro.remaining = Duration::from_secs(3 * 60);
        let text = render(&mut PomodoroPanel::new(pomodoro));
        assert!(text.contains("03:00"));
        assert!(text.contains("ON BREAK"));
        assert!(text.contains(" 40% 02:00/05:00"));

        pomodoro.remaining = Duration::ZERO;
        let text = render(&mut PomodoroPanel::new(pomodoro));
        assert!(text.contains("BREAK OVER"));
    }

    #[test]
    fn test_stopwatch() {
        let stopwatch = Stopwatch {
            elapsed: Duration::from_secs(3_725),
            running: true,
        };
        let text = render(&mut StopwatchPanel::new(stopwatch));
        assert!(text.contains("STOPWATCH"));
        assert!(text.contains("01:02:05"));
        assert!(text.contains("RUNNING"));

        let text = render(&mut StopwatchPanel::new(Stopwatch::default()));
        assert!(text.contains("00:00"));
        assert!(text.contains("STOPPED"));
    }
}
