//! # Prompt Component
//!
//! The interactive question asked by the input loop (T, A, Z). Drawn while
//! the input loop owns the terminal, so it covers the whole screen.
//!
//! ```text
//! ┌ Change Timer Duration ──────────────────────┐
//! │ Current duration: 25 min                    │
//! │                                             │
//! │ Enter new timer duration in minutes (...)   │
//! │ > 30_                                       │
//! │ '0' is not a valid duration. ...            │
//! └──────── Enter Confirm  Esc Cancel ──────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::command::PromptKind;
use crate::tui::component::Component;

const PROMPT_MARKER: &str = "> ";

/// What the prompt shows for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub kind: PromptKind,
    /// Current value of whatever is being changed.
    pub context: String,
    pub input: String,
    /// Why the last answer was rejected.
    pub error: Option<String>,
}

impl PromptView {
    pub fn new(kind: PromptKind, context: String) -> Self {
        Self {
            kind,
            context,
            input: String::new(),
            error: None,
        }
    }
}

pub struct PromptPanel<'a> {
    view: &'a PromptView,
}

impl<'a> PromptPanel<'a> {
    pub fn new(view: &'a PromptView) -> Self {
        Self { view }
    }
}

impl Component for PromptPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [row] = Layout::vertical([Constraint::Length(10)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Percentage(80)])
            .flex(Flex::Center)
            .areas(row);

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", self.view.kind.title()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(" Enter Confirm  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [context_area, question_area, input_area, error_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.view.context.as_str())
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)),
            context_area,
        );
        frame.render_widget(
            Paragraph::new(self.view.kind.question())
                .style(Style::default().add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true }),
            question_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(PROMPT_MARKER, Style::default().fg(Color::Cyan)),
                Span::raw(self.view.input.as_str()),
            ])),
            input_area,
        );
        if let Some(error) = &self.view.error {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true }),
                error_area,
            );
        }

        // Display width, not byte length
        let offset = (PROMPT_MARKER.width() + self.view.input.width()) as u16;
        let max_x = input_area.right().saturating_sub(1);
        frame.set_cursor_position(((input_area.x + offset).min(max_x), input_area.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Position;

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(80, 20)).unwrap()
    }

    #[test]
    fn test_prompt_shows_title_question_and_input() {
        let mut view = PromptView::new(PromptKind::Duration, "Current duration: 25 min".to_string());
        view.input = "30".to_string();

        let mut terminal = terminal();
        terminal
            .draw(|f| PromptPanel::new(&view).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Change Timer Duration"));
        assert!(text.contains("Current duration: 25 min"));
        assert!(text.contains("> 30"));
        assert!(text.contains("Esc Cancel"));
    }

    #[test]
    fn test_prompt_shows_error() {
        let mut view = PromptView::new(PromptKind::Alarm, "No alarm set".to_string());
        view.error = Some("'25:00' is not a valid time.".to_string());

        let mut terminal = terminal();
        terminal
            .draw(|f| PromptPanel::new(&view).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Set Alarm Time"));
        assert!(text.contains("is not a valid time"));
    }

    #[test]
    fn test_cursor_follows_display_width() {
        let mut ascii = PromptView::new(PromptKind::Zone, String::new());
        ascii.input = "ab".to_string();
        let mut wide = PromptView::new(PromptKind::Zone, String::new());
        wide.input = "東京".to_string();

        let mut terminal = terminal();
        terminal
            .draw(|f| PromptPanel::new(&ascii).render(f, f.area()))
            .unwrap();
        let Position { x: ascii_x, y: ascii_y } = terminal.get_cursor_position().unwrap();

        terminal
            .draw(|f| PromptPanel::new(&wide).render(f, f.area()))
            .unwrap();
        let Position { x: wide_x, y: wide_y } = terminal.get_cursor_position().unwrap();

        assert_eq!(ascii_y, wide_y);
        // Two wide chars take four columns
        assert_eq!(wide_x, ascii_x + 2);
    }
}
