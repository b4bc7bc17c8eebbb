//! # Commands
//!
//! The dashboard is driven by single letters followed by Enter. This module
//! turns a submitted line into a `Command`, and a prompt answer into an
//! `Action`.

use std::fmt;

use chrono::NaiveTime;

use crate::core::action::Action;
use crate::core::config::ALARM_TIME_FORMAT;
use crate::core::zones;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ChangeZone,
    ToggleFormat,
    TogglePause,
    ResetTimer,
    SetDuration,
    StartBreak,
    ToggleStopwatch,
    ResetStopwatch,
    Alarm,
    Help,
    Quit,
}

impl Command {
    /// Only the first character counts, case-insensitively.
    pub fn parse(line: &str) -> Option<Command> {
        let letter = line.trim().chars().next()?.to_ascii_uppercase();
        match letter {
            'Z' => Some(Command::ChangeZone),
            'F' => Some(Command::ToggleFormat),
            'P' => Some(Command::TogglePause),
            'R' => Some(Command::ResetTimer),
            'T' => Some(Command::SetDuration),
            'B' => Some(Command::StartBreak),
            'S' => Some(Command::ToggleStopwatch),
            'W' => Some(Command::ResetStopwatch),
            'A' => Some(Command::Alarm),
            'H' => Some(Command::Help),
            'Q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// The interactive questions the input loop can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Duration,
    Alarm,
    Zone,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Duration => "Change Timer Duration",
            PromptKind::Alarm => "Set Alarm Time",
            PromptKind::Zone => "Change Time Zone",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            PromptKind::Duration => "Enter new timer duration in minutes (e.g. 5, 30)",
            PromptKind::Alarm => {
                "Enter new alarm time (HH:MM, 24h), or leave blank to cancel the current alarm"
            }
            PromptKind::Zone => "Enter the new main time zone (e.g. Africa/Johannesburg, Europe/Paris)",
        }
    }

    pub fn cancel_message(self) -> &'static str {
        match self {
            PromptKind::Duration => "Timer duration change cancelled.",
            PromptKind::Alarm => "Alarm setting cancelled.",
            PromptKind::Zone => "Time zone change cancelled.",
        }
    }

    /// `Ok(None)` means the user backed out.
    pub fn parse_answer(self, answer: &str) -> Result<Option<Action>, InputError> {
        let answer = answer.trim();
        match self {
            PromptKind::Duration if answer.is_empty() => Ok(None),
            PromptKind::Duration => parse_duration_minutes(answer).map(|m| Some(Action::SetTimerDuration(m))),
            PromptKind::Alarm if answer.is_empty() => Ok(Some(Action::ClearAlarm)),
            PromptKind::Alarm => parse_alarm_time(answer).map(|t| Some(Action::SetAlarm(t))),
            PromptKind::Zone if answer.is_empty() => Ok(None),
            PromptKind::Zone => zones::resolve(answer)
                .map(|tz| Some(Action::SetMainZone(tz)))
                .ok_or_else(|| InputError::UnknownZone(answer.to_string())),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidDuration(String),
    InvalidTime(String),
    UnknownZone(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidDuration(s) => {
                write!(f, "'{s}' is not a valid duration. Enter a whole, positive number of minutes.")
            }
            InputError::InvalidTime(s) => {
                write!(f, "'{s}' is not a valid time. Use HH:MM (24-hour).")
            }
            InputError::UnknownZone(s) => {
                write!(f, "Time zone '{s}' is not valid. Use IANA format (e.g. America/New_York).")
            }
        }
    }
}

impl std::error::Error for InputError {}

// ============================================================================
// Parsers
// ============================================================================

pub fn parse_duration_minutes(input: &str) -> Result<u32, InputError> {
    match input.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(InputError::InvalidDuration(input.trim().to_string())),
    }
}

/// `HH:MM`, 00:00 to 23:59.
pub fn parse_alarm_time(input: &str) -> Result<NaiveTime, InputError> {
    NaiveTime::parse_from_str(input.trim(), ALARM_TIME_FORMAT)
        .map_err(|_| InputError::InvalidTime(input.trim().to_string()))
}
