//! # Actions
//!
//! Everything a user can do to the dashboard becomes an `Action`.
//! `update()` applies it to the `Dashboard` and reports what the caller
//! has to do afterwards (persist, quit). No I/O here.
//!
//! ```text
//! Dashboard + Action + now  →  update()  →  Dashboard' + Effect
//! ```
//!
//! Timers are advanced to `now` before the action lands, so the time spent
//! before a pause or stop is credited under the old running state.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use log::{debug, info};

use crate::core::config::ALARM_TIME_FORMAT;
use crate::core::state::Dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    ResetTimer,
    SetTimerDuration(u32),
    StartBreak,
    ToggleStopwatch,
    ResetStopwatch,
    ToggleTimeFormat,
    SetMainZone(Tz),
    SetAlarm(NaiveTime),
    ClearAlarm,
    SilenceAlarm,
    ToggleHelp,
    DismissHelp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// A persisted setting changed.
    SaveConfig,
    Quit,
}

pub fn update(dashboard: &mut Dashboard, action: Action, now: DateTime<Utc>) -> Effect {
    debug!("update: {:?}", action);
    dashboard.advance_to(now);
    let timers = &mut dashboard.timers;

    match action {
        Action::TogglePause => {
            if timers.pomodoro.toggle_pause() {
                dashboard.status_message = if timers.pomodoro.paused {
                    "Timer paused.".to_string()
                } else {
                    "Timer running.".to_string()
                };
            } else {
                dashboard.status_message = "Timer complete. Press 'R' to reset.".to_string();
            }
            Effect::None
        }
        Action::ResetTimer => {
            timers.pomodoro.reset();
            dashboard.status_message = "Timer reset.".to_string();
            Effect::None
        }
        Action::StartBreak => {
            dashboard.status_message = if timers.pomodoro.start_break() {
                info!("Break started ({} min)", timers.pomodoro.break_minutes);
                format!(
                    "Break started ({} min). Press 'R' to get back to work.",
                    timers.pomodoro.break_minutes
                )
            } else {
                "A break can start once the focus session is complete.".to_string()
            };
            Effect::None
        }
        Action::SetTimerDuration(minutes) => {
            timers.pomodoro.set_duration(minutes);
            dashboard.status_message =
                format!("Timer duration updated to {minutes} minutes (timer reset and paused).");
            Effect::SaveConfig
        }
        Action::ToggleStopwatch => {
            timers.stopwatch.toggle();
            dashboard.status_message = if timers.stopwatch.running {
                "Stopwatch started.".to_string()
            } else {
                "Stopwatch stopped.".to_string()
            };
            Effect::None
        }
        Action::ResetStopwatch => {
            dashboard.status_message = if timers.stopwatch.reset() {
                "Stopwatch reset.".to_string()
            } else {
                "Stop the stopwatch ('S') before resetting it.".to_string()
            };
            Effect::None
        }
        Action::ToggleTimeFormat => {
            dashboard.is_24_hour_format = !dashboard.is_24_hour_format;
            dashboard.status_message = if dashboard.is_24_hour_format {
                "Showing 24-hour time.".to_string()
            } else {
                "Showing 12-hour time.".to_string()
            };
            Effect::SaveConfig
        }
        Action::SetMainZone(zone) => {
            dashboard.main_zone = zone;
            dashboard.status_message = format!("Main time zone updated to {}.", zone.name());
            info!("Main zone changed to {}", zone.name());
            Effect::SaveConfig
        }
        Action::SetAlarm(time) => {
            timers.alarm.set(Some(time));
            dashboard.status_message = format!(
                "Alarm set for {} in zone {}.",
                time.format(ALARM_TIME_FORMAT),
                dashboard.main_zone.name()
            );
            info!("Alarm set for {}", time.format(ALARM_TIME_FORMAT));
            Effect::SaveConfig
        }
        Action::ClearAlarm => {
            if timers.alarm.time.is_some() {
                timers.alarm.set(None);
                dashboard.status_message = "Current alarm cancelled.".to_string();
                Effect::SaveConfig
            } else {
                dashboard.status_message = "Alarm setting cancelled.".to_string();
                Effect::None
            }
        }
        Action::SilenceAlarm => {
            if !timers.alarm.ringing {
                return Effect::None;
            }
            timers.alarm.silence();
            dashboard.status_message = "Alarm silenced and cleared.".to_string();
            info!("Alarm silenced");
            Effect::SaveConfig
        }
        Action::ToggleHelp => {
            dashboard.show_help = !dashboard.show_help;
            Effect::None
        }
        Action::DismissHelp => {
            dashboard.show_help = false;
            Effect::None
        }
        Action::Quit => {
            dashboard.should_quit = true;
            Effect::Quit
        }
    }
}
