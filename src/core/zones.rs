//! Time zone lookup and clock formatting.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};

pub const DEFAULT_SECONDARY_ZONES: &[&str] = &["Europe/London", "America/New_York", "Asia/Tokyo"];

/// Looks up an IANA zone name (e.g. `Europe/Paris`).
pub fn resolve(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// The zone the operating system is configured for, or UTC if it can't be
/// determined.
pub fn system_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => resolve(&name).unwrap_or_else(|| {
            warn!("System time zone {name:?} is not in the zone database, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not determine system time zone ({e}), using UTC");
            Tz::UTC
        }
    }
}

/// City part of a zone name: `America/New_York` → `New York`.
pub fn display_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).replace('_', " ")
}

/// Wall-clock time of day in `zone`.
pub fn local_time(now: DateTime<Utc>, zone: Tz) -> NaiveTime {
    now.with_timezone(&zone).time()
}

pub fn format_time(time: NaiveTime, is_24_hour: bool, with_seconds: bool) -> String {
    let pattern = match (is_24_hour, with_seconds) {
        (true, true) => "%H:%M:%S",
        (true, false) => "%H:%M",
        (false, true) => "%I:%M:%S %p",
        (false, false) => "%I:%M %p",
    };
    time.format(pattern).to_string()
}

/// e.g. `Sunday, 01 March 2026`
pub fn format_date(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone).format("%A, %d %B %Y").to_string()
}
