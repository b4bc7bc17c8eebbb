//! # Clock
//!
//! The single source of "now" for the dashboard. Everything time-dependent
//! takes its instant from a `Clock` so tests can drive time by hand.

use chrono::{DateTime, Utc};

/// Returns the current wall-clock instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ManualClock;
    use chrono::TimeDelta;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_only_moves_when_told() {
        let start = DateTime::parse_from_rfc3339("2026-01-01T06:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(TimeDelta::seconds(1));
        assert_eq!(clock.now(), start + TimeDelta::seconds(1));
        // Going back is allowed; the timer engine clamps it
        clock.set(start - TimeDelta::hours(1));
        assert_eq!(clock.now(), start - TimeDelta::hours(1));
    }
}
