//! # Configuration
//!
//! Settings and resumable session state, persisted as sparse TOML.
//!
//! Config lives at `~/.tempo/config.toml` unless `--config` says otherwise.
//! Every field is optional on disk; `resolve` collapses the file into a
//! `ResolvedConfig` of concrete values, replacing anything unusable with a
//! default and a warning. A missing file is just an empty one.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::core::state::Dashboard;
use crate::core::timer::{AlarmGranularity, DEFAULT_BREAK_MINUTES, DEFAULT_DURATION_MINUTES, Phase};
use crate::core::zones;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct TempoConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockConfig {
    pub main_zone: Option<String>,
    pub secondary_zones: Option<Vec<String>>,
    pub is_24_hour_format: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct PomodoroConfig {
    pub duration_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
    pub completed_sessions: Option<u32>,
    pub total_focus_seconds: Option<u64>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlarmConfig {
    /// `HH:MM`, 24-hour, in the main zone.
    pub time: Option<String>,
    pub granularity: Option<AlarmGranularity>,
    pub bell_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub refresh_per_second: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    pub saved_at: Option<DateTime<Utc>>,
    pub timer_phase: Option<Phase>,
    pub timer_remaining_seconds: Option<f64>,
    pub is_timer_paused: Option<bool>,
    pub stopwatch_elapsed_seconds: Option<f64>,
    pub is_stopwatch_running: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REFRESH_PER_SECOND: u32 = 8;
pub const DEFAULT_BELL_INTERVAL_MS: u64 = 1000;
pub const ALARM_TIME_FORMAT: &str = "%H:%M";

/// Longest counter value a saved session may carry. Anything above is
/// treated as corrupt.
pub const MAX_SESSION_SPAN: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub main_zone: Tz,
    pub secondary_zones: Vec<String>,
    pub is_24_hour_format: bool,
    pub duration_minutes: u32,
    pub break_minutes: u32,
    pub completed_sessions: u32,
    pub total_focus: Duration,
    pub alarm_time: Option<NaiveTime>,
    pub alarm_granularity: AlarmGranularity,
    pub bell_interval: Duration,
    pub refresh_per_second: u32,
    pub resume: Option<SessionResume>,
}

/// Counter state saved on exit, picked up on the next start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResume {
    pub saved_at: DateTime<Utc>,
    pub timer_phase: Phase,
    pub timer_remaining: Duration,
    pub is_timer_paused: bool,
    pub stopwatch_elapsed: Duration,
    pub is_stopwatch_running: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            main_zone: Tz::UTC,
            secondary_zones: zones::DEFAULT_SECONDARY_ZONES
                .iter()
                .map(|z| z.to_string())
                .collect(),
            is_24_hour_format: true,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            completed_sessions: 0,
            total_focus: Duration::ZERO,
            alarm_time: None,
            alarm_granularity: AlarmGranularity::default(),
            bell_interval: Duration::from_millis(DEFAULT_BELL_INTERVAL_MS),
            refresh_per_second: DEFAULT_REFRESH_PER_SECOND,
            resume: None,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading / Saving
// ============================================================================

/// Returns the path to `~/.tempo/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tempo").join("config.toml"))
}

/// Load config from `path`. A missing file yields `TempoConfig::default()`.
pub fn load_config(path: &Path) -> Result<TempoConfig, ConfigError> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(TempoConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TempoConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Atomically write the config to `path` (via `.tmp` + rename).
pub fn save_config(path: &Path, config: &TempoConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).map_err(ConfigError::Io)?;
    fs::rename(&tmp_path, path).map_err(ConfigError::Io)?;
    debug!("Saved config to {}", path.display());
    Ok(())
}

// ============================================================================
// Resolution
// ============================================================================

/// Collapse the sparse file into concrete values: file → defaults.
/// `system_zone` is used when no (valid) main zone is configured.
pub fn resolve(config: &TempoConfig, system_zone: Tz) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let main_zone = match config.clock.main_zone.as_deref() {
        Some(name) => zones::resolve(name).unwrap_or_else(|| {
            warn!("Unknown main zone {name:?} in config, using {}", system_zone.name());
            system_zone
        }),
        None => system_zone,
    };

    let duration_minutes = match config.pomodoro.duration_minutes {
        Some(0) => {
            warn!("Pomodoro duration of 0 minutes in config, using {DEFAULT_DURATION_MINUTES}");
            DEFAULT_DURATION_MINUTES
        }
        Some(minutes) => minutes,
        None => DEFAULT_DURATION_MINUTES,
    };

    let break_minutes = match config.pomodoro.break_minutes {
        Some(0) => {
            warn!("Break of 0 minutes in config, using {DEFAULT_BREAK_MINUTES}");
            DEFAULT_BREAK_MINUTES
        }
        Some(minutes) => minutes,
        None => DEFAULT_BREAK_MINUTES,
    };

    let alarm_time = config.alarm.time.as_deref().and_then(|raw| {
        let parsed = NaiveTime::parse_from_str(raw.trim(), ALARM_TIME_FORMAT).ok();
        if parsed.is_none() {
            warn!("Ignoring alarm time {raw:?} in config (expected HH:MM)");
        }
        parsed
    });

    let refresh_per_second = match config.display.refresh_per_second {
        Some(0) => {
            warn!("refresh_per_second = 0 in config, using {DEFAULT_REFRESH_PER_SECOND}");
            DEFAULT_REFRESH_PER_SECOND
        }
        Some(rate) => rate,
        None => DEFAULT_REFRESH_PER_SECOND,
    };

    ResolvedConfig {
        main_zone,
        secondary_zones: config
            .clock
            .secondary_zones
            .clone()
            .unwrap_or(defaults.secondary_zones),
        is_24_hour_format: config
            .clock
            .is_24_hour_format
            .unwrap_or(defaults.is_24_hour_format),
        duration_minutes,
        break_minutes,
        completed_sessions: config.pomodoro.completed_sessions.unwrap_or(0),
        total_focus: Duration::from_secs(config.pomodoro.total_focus_seconds.unwrap_or(0)),
        alarm_time,
        alarm_granularity: config.alarm.granularity.unwrap_or_default(),
        bell_interval: config
            .alarm
            .bell_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.bell_interval),
        refresh_per_second,
        resume: resolve_session(&config.session, duration_minutes, break_minutes),
    }
}

/// A session is only resumed when it says when it was saved. A countdown
/// that can't be read restarts from the full length of its phase.
fn resolve_session(
    session: &SessionConfig,
    duration_minutes: u32,
    break_minutes: u32,
) -> Option<SessionResume> {
    let saved_at = session.saved_at?;
    let timer_phase = session.timer_phase.unwrap_or_default();
    let phase_minutes = match timer_phase {
        Phase::Work => duration_minutes,
        Phase::Break => break_minutes,
    };
    let timer_remaining = session_seconds("timer_remaining_seconds", session.timer_remaining_seconds)
        .unwrap_or_else(|| {
            warn!("No usable timer_remaining_seconds in saved session, restarting the countdown");
            Duration::from_secs(u64::from(phase_minutes) * 60)
        });
    Some(SessionResume {
        saved_at,
        timer_phase,
        timer_remaining,
        is_timer_paused: session.is_timer_paused.unwrap_or(true),
        stopwatch_elapsed: session_seconds("stopwatch_elapsed_seconds", session.stopwatch_elapsed_seconds)
            .unwrap_or(Duration::ZERO),
        is_stopwatch_running: session.is_stopwatch_running.unwrap_or(false),
    })
}

/// A saved counter. Negative, non-finite or implausibly large values are
/// dropped with a warning.
fn session_seconds(field: &str, value: Option<f64>) -> Option<Duration> {
    let raw = value?;
    match Duration::try_from_secs_f64(raw) {
        Ok(duration) if duration <= MAX_SESSION_SPAN => Some(duration),
        _ => {
            warn!("Ignoring [session] {field} = {raw} in config");
            None
        }
    }
}

/// The persisted subset of the dashboard. Settings that never live in the
/// dashboard (granularity aside) are carried over from `base`.
pub fn from_dashboard(
    dashboard: &Dashboard,
    base: &TempoConfig,
    now: DateTime<Utc>,
) -> TempoConfig {
    let timers = &dashboard.timers;
    TempoConfig {
        clock: ClockConfig {
            main_zone: Some(dashboard.main_zone.name().to_string()),
            secondary_zones: Some(dashboard.secondary_zones.clone()),
            is_24_hour_format: Some(dashboard.is_24_hour_format),
        },
        pomodoro: PomodoroConfig {
            duration_minutes: Some(timers.pomodoro.duration_minutes),
            break_minutes: Some(timers.pomodoro.break_minutes),
            completed_sessions: Some(timers.pomodoro.completed_sessions),
            total_focus_seconds: Some(timers.pomodoro.total_focus.as_secs()),
        },
        alarm: AlarmConfig {
            time: timers
                .alarm
                .time
                .map(|t| t.format(ALARM_TIME_FORMAT).to_string()),
            granularity: Some(timers.alarm.granularity),
            bell_interval_ms: base.alarm.bell_interval_ms,
        },
        display: base.display.clone(),
        session: SessionConfig {
            saved_at: Some(now),
            timer_phase: Some(timers.pomodoro.phase),
            timer_remaining_seconds: Some(timers.pomodoro.remaining.as_secs_f64()),
            is_timer_paused: Some(timers.pomodoro.paused),
            stopwatch_elapsed_seconds: Some(timers.stopwatch.elapsed.as_secs_f64()),
            is_stopwatch_running: Some(timers.stopwatch.running),
        },
    }
}

// ============================================================================
// Store
// ============================================================================

/// Where the dashboard is saved to, plus the on-disk settings it doesn't own.
/// Without a path, saves are skipped.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    base: TempoConfig,
}

impl ConfigStore {
    pub fn new(path: Option<PathBuf>, base: TempoConfig) -> Self {
        Self { path, base }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Best effort: failures are logged, never propagated.
    pub fn save(&self, dashboard: &Dashboard, now: DateTime<Utc>) {
        let Some(path) = &self.path else {
            debug!("No config path, skipping save");
            return;
        };
        let config = from_dashboard(dashboard, &self.base, now);
        if let Err(e) = save_config(path, &config) {
            warn!("Failed to save config to {}: {}", path.display(), e);
        }
    }
}
