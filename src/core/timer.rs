//! # Timer Engine
//!
//! Advances the Pomodoro countdown, the stopwatch and the alarm from the
//! wall-clock time elapsed since the last evaluation.
//!
//! ```text
//! Timers + now  →  advance()  →  Timers' + TickEvents
//! ```
//!
//! `advance` is pure: no I/O, no clock reads, total over its input. Renders
//! are not guaranteed to land exactly on schedule, so counters are driven by
//! `now - last_evaluated_at` deltas rather than by counting ticks.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

// ============================================================================
// Pomodoro
// ============================================================================

/// Which countdown is on the panel. A break is only ever entered by hand,
/// after a focus session has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pomodoro {
    pub duration_minutes: u32,
    pub break_minutes: u32,
    pub phase: Phase,
    /// Always within `0..=full()`.
    pub remaining: Duration,
    pub paused: bool,
    /// Finished focus sessions. Breaks don't count.
    pub completed_sessions: u32,
    pub total_focus: Duration,
}

impl Pomodoro {
    /// A full, paused focus countdown of the given length.
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            break_minutes: DEFAULT_BREAK_MINUTES,
            phase: Phase::Work,
            remaining: full_duration(duration_minutes),
            paused: true,
            completed_sessions: 0,
            total_focus: Duration::ZERO,
        }
    }

    /// Length of the current phase.
    pub fn full(&self) -> Duration {
        self.phase_length(self.phase)
    }

    pub fn phase_length(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => full_duration(self.duration_minutes),
            Phase::Break => full_duration(self.break_minutes),
        }
    }

    /// Reached zero. Stays here until `reset` or `start_break`.
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Share of the current phase already counted down, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let full = self.full();
        if full.is_zero() {
            return 1.0;
        }
        let done = full.saturating_sub(self.remaining);
        (done.as_secs_f64() / full.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Flips pause. An expired countdown cannot be resumed, only reset.
    /// Returns whether anything changed.
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_expired() {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Back to a full focus countdown, counting.
    pub fn reset(&mut self) {
        self.phase = Phase::Work;
        self.remaining = self.full();
        self.paused = false;
    }

    /// Starts the break countdown. Only allowed once a focus session has
    /// run out; returns whether the break started.
    pub fn start_break(&mut self) -> bool {
        if self.phase != Phase::Work || !self.is_expired() {
            return false;
        }
        self.phase = Phase::Break;
        self.remaining = self.full();
        self.paused = false;
        true
    }

    /// New focus duration: back to work, refilled, waiting for `P`.
    pub fn set_duration(&mut self, minutes: u32) {
        self.duration_minutes = minutes;
        self.phase = Phase::Work;
        self.remaining = self.full();
        self.paused = true;
    }
}

fn full_duration(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

// ============================================================================
// Stopwatch
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stopwatch {
    pub elapsed: Duration,
    pub running: bool,
}

impl Stopwatch {
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Zeroes the accumulator. Ignored while running; returns whether it reset.
    pub fn reset(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.elapsed = Duration::ZERO;
        true
    }
}

// ============================================================================
// Alarm
// ============================================================================

/// How precisely the wall clock has to agree with the alarm time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmGranularity {
    /// Hour and minute agree; the alarm can trigger anywhere in that minute.
    #[default]
    Minute,
    /// Hour, minute and second agree.
    Second,
}

impl AlarmGranularity {
    pub fn matches(self, now: NaiveTime, alarm: NaiveTime) -> bool {
        let same_minute = now.hour() == alarm.hour() && now.minute() == alarm.minute();
        match self {
            AlarmGranularity::Minute => same_minute,
            AlarmGranularity::Second => same_minute && now.second() == alarm.second(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alarm {
    /// Time of day in the main zone. `None` = disabled.
    pub time: Option<NaiveTime>,
    /// Latched: only `silence` or `set` clear it.
    pub ringing: bool,
    pub granularity: AlarmGranularity,
}

impl Alarm {
    /// Arms (or with `None` disarms) the alarm. Clears any ringing.
    pub fn set(&mut self, time: Option<NaiveTime>) {
        self.time = time;
        self.ringing = false;
    }

    /// Stops the ringing and disarms, so the still-matching minute can't
    /// trigger it again.
    pub fn silence(&mut self) {
        self.set(None);
    }
}

// ============================================================================
// Engine
// ============================================================================

/// All time-dependent fields, advanced together so a reader never sees a
/// counter that disagrees with `last_evaluated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub pomodoro: Pomodoro,
    pub stopwatch: Stopwatch,
    pub alarm: Alarm,
    pub last_evaluated_at: DateTime<Utc>,
}

impl Timers {
    pub fn new(duration_minutes: u32, now: DateTime<Utc>) -> Self {
        Self {
            pomodoro: Pomodoro::new(duration_minutes),
            stopwatch: Stopwatch::default(),
            alarm: Alarm::default(),
            last_evaluated_at: now,
        }
    }
}

/// Edges the caller should surface (bell, log). Levels such as "ringing"
/// live in `Timers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvents {
    pub timer_expired: bool,
    pub alarm_triggered: bool,
}

impl TickEvents {
    pub fn merge(&mut self, other: TickEvents) {
        self.timer_expired |= other.timer_expired;
        self.alarm_triggered |= other.alarm_triggered;
    }

    pub fn any(&self) -> bool {
        self.timer_expired || self.alarm_triggered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advanced {
    pub timers: Timers,
    pub events: TickEvents,
}

/// Advances every counter to `now`. `zone` is the main zone, in which the
/// alarm time of day is interpreted.
pub fn advance(timers: Timers, now: DateTime<Utc>, zone: Tz) -> Advanced {
    let mut next = timers;
    let mut events = TickEvents::default();

    // Clock went backwards: credit nothing.
    let delta = (now - timers.last_evaluated_at)
        .to_std()
        .unwrap_or(Duration::ZERO);

    let pomodoro = &mut next.pomodoro;
    if !pomodoro.paused && !pomodoro.is_expired() {
        pomodoro.remaining = pomodoro.remaining.saturating_sub(delta);
        if pomodoro.is_expired() {
            if pomodoro.phase == Phase::Work {
                let full = pomodoro.full();
                pomodoro.completed_sessions = pomodoro.completed_sessions.saturating_add(1);
                pomodoro.total_focus = pomodoro.total_focus.saturating_add(full);
            }
            events.timer_expired = true;
        }
    }

    if next.stopwatch.running {
        next.stopwatch.elapsed = next.stopwatch.elapsed.saturating_add(delta);
    }

    if let Some(alarm_time) = next.alarm.time
        && !next.alarm.ringing
    {
        let local = now.with_timezone(&zone).time();
        if next.alarm.granularity.matches(local, alarm_time) {
            next.alarm.ringing = true;
            events.alarm_triggered = true;
        }
    }

    next.last_evaluated_at = now;
    Advanced {
        timers: next,
        events,
    }
}

/// `MM:SS`, or `HH:MM:SS` once an hour is reached. Sub-seconds are dropped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
