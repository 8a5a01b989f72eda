//! Wall-clock access for date-dependent rules.

use chrono::{DateTime, Datelike, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current (two-digit year, month) pair, read fresh on every call.
    fn year_month(&self) -> (u32, u32) {
        let now = self.now();
        (now.year().rem_euclid(100) as u32, now.month())
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_year_month() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2031, 7, 15, 12, 0, 0).unwrap());
        assert_eq!(clock.year_month(), (31, 7));
    }

    #[test]
    fn test_century_rollover() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(clock.year_month(), (0, 1));
    }
}
