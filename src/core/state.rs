//! # Dashboard State
//!
//! The one mutable record shared by the render loop and the input loop.
//!
//! ```text
//! Dashboard
//! ├── main_zone: Tz                   // clock + alarm zone
//! ├── secondary_zones: Vec<String>    // extra clocks, may hold unknown names
//! ├── is_24_hour_format: bool
//! ├── timers: Timers                  // pomodoro, stopwatch, alarm, last_evaluated_at
//! ├── pending_events: TickEvents      // edges not yet surfaced by a draw
//! ├── show_help: bool
//! ├── status_message: String          // header line
//! ├── command_buffer: String          // keys typed before Enter
//! ├── awaiting_input: bool            // input loop owns the terminal
//! ├── redraw_requested: bool          // wake the renderer early
//! └── should_quit: bool
//! ```
//!
//! It lives behind `SharedState`'s mutex; see `core::shared`.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::core::config::ResolvedConfig;
use crate::core::timer::{self, TickEvents, Timers};

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub main_zone: Tz,
    pub secondary_zones: Vec<String>,
    pub is_24_hour_format: bool,
    pub timers: Timers,
    pub pending_events: TickEvents,
    pub show_help: bool,
    pub status_message: String,
    pub command_buffer: String,
    /// True exactly while the input loop holds exclusive terminal access.
    pub awaiting_input: bool,
    pub redraw_requested: bool,
    pub should_quit: bool,
}

impl Dashboard {
    pub fn new(main_zone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            main_zone,
            secondary_zones: Vec::new(),
            is_24_hour_format: true,
            timers: Timers::new(timer::DEFAULT_DURATION_MINUTES, now),
            pending_events: TickEvents::default(),
            show_help: false,
            status_message: String::new(),
            command_buffer: String::new(),
            awaiting_input: false,
            redraw_requested: false,
            should_quit: false,
        }
    }

    /// Builds the startup state. A resumed session seeds `last_evaluated_at`
    /// with its save time so running counters catch up on the first tick.
    pub fn from_config(config: &ResolvedConfig, now: DateTime<Utc>) -> Self {
        let mut dashboard = Self::new(config.main_zone, now);
        dashboard.secondary_zones = config.secondary_zones.clone();
        dashboard.is_24_hour_format = config.is_24_hour_format;

        let timers = &mut dashboard.timers;
        timers.pomodoro.set_duration(config.duration_minutes);
        timers.pomodoro.break_minutes = config.break_minutes;
        timers.pomodoro.completed_sessions = config.completed_sessions;
        timers.pomodoro.total_focus = config.total_focus;
        timers.alarm.granularity = config.alarm_granularity;
        timers.alarm.set(config.alarm_time);

        if let Some(resume) = &config.resume {
            timers.pomodoro.phase = resume.timer_phase;
            timers.pomodoro.remaining = resume.timer_remaining.min(timers.pomodoro.full());
            timers.pomodoro.paused = resume.is_timer_paused;
            timers.stopwatch.elapsed = resume.stopwatch_elapsed;
            timers.stopwatch.running = resume.is_stopwatch_running;
            timers.last_evaluated_at = resume.saved_at.min(now);
        }

        dashboard.status_message = format!(
            "Starting clock. Main zone: {}. Pomodoro timer: {} min. Press 'H' + Enter for help.",
            dashboard.main_zone.name(),
            config.duration_minutes
        );
        dashboard
    }

    /// Runs the timer engine up to `now`. Edges are also queued in
    /// `pending_events` until a draw takes them.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> TickEvents {
        let advanced = timer::advance(self.timers, now, self.main_zone);
        self.timers = advanced.timers;
        self.pending_events.merge(advanced.events);
        advanced.events
    }

    pub fn take_events(&mut self) -> TickEvents {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            now,
            main_zone: self.main_zone,
            secondary_zones: self.secondary_zones.clone(),
            is_24_hour_format: self.is_24_hour_format,
            timers: self.timers,
            show_help: self.show_help,
            status_message: self.status_message.clone(),
            command_buffer: self.command_buffer.clone(),
        }
    }
}

/// Read-only copy of everything a frame shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub now: DateTime<Utc>,
    pub main_zone: Tz,
    pub secondary_zones: Vec<String>,
    pub is_24_hour_format: bool,
    pub timers: Timers,
    pub show_help: bool,
    pub status_message: String,
    pub command_buffer: String,
}
