//! # Clock Panels
//!
//! `MainClock` shows the date and time in the main zone plus the alarm
//! state; `ZoneList` shows the secondary zones, one row each.
//!
//! Secondary zones are kept as the names the user configured. A name the
//! zone database doesn't know is rendered as `INVALID` rather than failing
//! the frame.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table};

use crate::core::config::ALARM_TIME_FORMAT;
use crate::core::zones;
use crate::tui::component::Component;

pub struct MainClock {
    pub now: DateTime<Utc>,
    pub zone: Tz,
    pub is_24_hour_format: bool,
    pub alarm_time: Option<NaiveTime>,
    pub alarm_ringing: bool,
}

impl MainClock {
    pub fn new(
        now: DateTime<Utc>,
        zone: Tz,
        is_24_hour_format: bool,
        alarm_time: Option<NaiveTime>,
        alarm_ringing: bool,
    ) -> Self {
        Self {
            now,
            zone,
            is_24_hour_format,
            alarm_time,
            alarm_ringing,
        }
    }

    fn alarm_line(&self) -> Line<'static> {
        if self.alarm_ringing {
            Line::from(Span::styled(
                "!!! ALARM RINGING !!! Press 'A' + Enter to silence.",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED | Modifier::SLOW_BLINK),
            ))
        } else if let Some(time) = self.alarm_time {
            Line::from(Span::styled(
                format!("Alarm Set: {}", time.format(ALARM_TIME_FORMAT)),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                format!("Main Zone: {}", self.zone.name()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
        }
    }
}

impl Component for MainClock {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let time = zones::format_time(
            zones::local_time(self.now, self.zone),
            self.is_24_hour_format,
            true,
        );
        let lines = vec![
            Line::from(Span::styled(
                zones::format_date(self.now, self.zone),
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            )),
            Line::from(""),
            Line::from(Span::styled(
                time,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            self.alarm_line(),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                " MAIN CLOCK ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
    }
}

pub struct ZoneList {
    pub now: DateTime<Utc>,
    pub zones: Vec<String>,
    pub is_24_hour_format: bool,
}

impl ZoneList {
    pub fn new(now: DateTime<Utc>, zones: Vec<String>, is_24_hour_format: bool) -> Self {
        Self {
            now,
            zones,
            is_24_hour_format,
        }
    }
}

impl Component for ZoneList {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Span::styled(
                " Other Zones ",
                Style::default().add_modifier(Modifier::BOLD),
            ));

        if self.zones.is_empty() {
            let empty = Paragraph::new("No secondary time zones configured.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block.border_style(Style::default().fg(Color::DarkGray)));
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .zones
            .iter()
            .map(|name| match zones::resolve(name) {
                Some(zone) => Row::new(vec![
                    Span::styled(
                        zones::display_name(name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        zones::format_time(
                            zones::local_time(self.now, zone),
                            self.is_24_hour_format,
                            false,
                        ),
                        Style::default().fg(Color::Green),
                    ),
                ]),
                None => {
                    let invalid = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
                    Row::new(vec![
                        Span::styled(name.clone(), invalid),
                        Span::styled("INVALID", invalid),
                    ])
                }
            })
            .collect();

        let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(8)])
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
    }
}
