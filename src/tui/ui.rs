//! Frame layout. Turns a `Snapshot` (or a `PromptView`) into one frame.
//!
//! ```text
//! ┌──────────────── Status ────────────────┐  3 rows
//! ├─────────── MAIN CLOCK ───┬─ Zones ─────┤  Fill
//! ├──── COUNTDOWN ───────────┼─ STOPWATCH ─┤  7 rows
//! └ > command               Focus: ...     ┘  1 row
//! ```
//!
//! While help is shown it replaces everything but the command line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::Snapshot;
use crate::tui::component::Component;
use crate::tui::components::{
    CommandLine, HelpPanel, MainClock, PomodoroPanel, PromptPanel, PromptView, StatusBar,
    StopwatchPanel, ZoneList,
};

pub fn draw_dashboard(frame: &mut Frame, snapshot: &Snapshot) {
    use Constraint::{Fill, Length, Min};
    let timers = &snapshot.timers;

    let [body_area, command_area] = Layout::vertical([Min(0), Length(1)]).areas(frame.area());

    CommandLine::new(
        snapshot.command_buffer.clone(),
        timers.pomodoro.completed_sessions,
        timers.pomodoro.total_focus,
    )
    .render(frame, command_area);

    if snapshot.show_help {
        HelpPanel::new().render(frame, body_area);
        return;
    }

    let [header_area, clocks_area, timers_area] =
        Layout::vertical([Length(3), Min(7), Length(6)]).areas(body_area);

    StatusBar::new(
        snapshot.status_message.clone(),
        snapshot.main_zone.name().to_string(),
        timers.pomodoro.duration_minutes,
        timers.alarm.ringing,
    )
    .render(frame, header_area);

    let [main_area, zones_area] = Layout::horizontal([Fill(2), Fill(1)]).areas(clocks_area);
    MainClock::new(
        snapshot.now,
        snapshot.main_zone,
        snapshot.is_24_hour_format,
        timers.alarm.time,
        timers.alarm.ringing,
    )
    .render(frame, main_area);
    ZoneList::new(
        snapshot.now,
        snapshot.secondary_zones.clone(),
        snapshot.is_24_hour_format,
    )
    .render(frame, zones_area);

    let [pomodoro_area, stopwatch_area] =
        Layout::horizontal([Fill(1), Fill(1)]).areas(timers_area);
    PomodoroPanel::new(timers.pomodoro).render(frame, pomodoro_area);
    StopwatchPanel::new(timers.stopwatch).render(frame, stopwatch_area);
}

pub fn draw_prompt(frame: &mut Frame, prompt: &PromptView) {
    PromptPanel::new(prompt).render(frame, frame.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::PromptKind;
    use crate::test_support::{buffer_text, test_dashboard, test_now};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(snapshot: &Snapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_dashboard(f, snapshot)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_dashboard_has_every_panel() {
        let mut dashboard = test_dashboard();
        dashboard.secondary_zones = vec!["Asia/Tokyo".to_string()];
        dashboard.status_message = "Timer reset.".to_string();
        let text = draw(&dashboard.snapshot(test_now()));

        assert!(text.contains("Timer reset."));
        assert!(text.contains("MAIN CLOCK"));
        assert!(text.contains("10:15:30"));
        assert!(text.contains("Tokyo"));
        assert!(text.contains("19:15"));
        assert!(text.contains("COUNTDOWN (POMODORO)"));
        assert!(text.contains("25:00"));
        assert!(text.contains("STOPWATCH"));
        assert!(text.contains("Focus: 0 sessions"));
    }

    #[test]
    fn test_help_replaces_panels() {
        let mut dashboard = test_dashboard();
        dashboard.show_help = true;
        dashboard.command_buffer = "h".to_string();
        let text = draw(&dashboard.snapshot(test_now()));

        assert!(text.contains("Application Controls"));
        assert!(!text.contains("MAIN CLOCK"));
        assert!(text.contains("> h"));
    }

    #[test]
    fn test_same_snapshot_same_frame() {
        let snapshot = test_dashboard().snapshot(test_now());
        assert_eq!(draw(&snapshot), draw(&snapshot));
    }

    #[test]
    fn test_prompt_frame() {
        let view = PromptView::new(PromptKind::Zone, "Current zone: UTC".to_string());
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| draw_prompt(f, &view)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Change Time Zone"));
        assert!(text.contains("Current zone: UTC"));
    }
}
