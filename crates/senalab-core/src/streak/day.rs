//! Calendar-day truncation under an explicit timezone policy.
//!
//! Streaks count calendar days, not elapsed hours, so every comparison goes
//! through [`DayBoundary::calendar_day`]. Two instants on the same calendar
//! day compare equal no matter their time of day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::error::ValidationError;

/// Which calendar decides where a day starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// Midnight UTC. Deterministic across hosts.
    #[default]
    Utc,
    /// Midnight in the host's local timezone.
    Local,
    /// Midnight at a fixed UTC offset.
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// Calendar date that `instant` falls on.
    pub fn calendar_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            DayBoundary::Utc => instant.date_naive(),
            DayBoundary::Local => instant.with_timezone(&chrono::Local).date_naive(),
            DayBoundary::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// The 00:00:00.000 instant that begins the calendar day containing `instant`.
    pub fn start_of_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.calendar_day(instant).and_time(NaiveTime::MIN);
        match self {
            DayBoundary::Utc => midnight.and_utc(),
            DayBoundary::Local => chrono::Local
                .from_local_datetime(&midnight)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                // Midnight skipped by a DST jump: use the offset in force at that wall time.
                .unwrap_or_else(|| {
                    let offset = chrono::Local.offset_from_utc_datetime(&midnight).fix();
                    (midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
                }),
            DayBoundary::Fixed(offset) => {
                (midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
            }
        }
    }

    /// Signed count of calendar days from `earlier`'s day to `later`'s day.
    ///
    /// Negative when `earlier` actually falls on a later day.
    pub fn gap_days(&self, earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
        self.calendar_day(later)
            .signed_duration_since(self.calendar_day(earlier))
            .num_days()
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayBoundary::Utc => write!(f, "utc"),
            DayBoundary::Local => write!(f, "local"),
            DayBoundary::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for DayBoundary {
    type Err = ValidationError;

    /// Accepts `utc`, `local`, or an offset such as `-06:00` / `+0530`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "z" => return Ok(DayBoundary::Utc),
            "local" => return Ok(DayBoundary::Local),
            _ => {}
        }

        let invalid = || ValidationError::InvalidValue {
            field: "day_boundary".into(),
            message: format!("expected utc, local or an offset like -06:00, got '{s}'"),
        };

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        offset_from_minutes(sign * (hours * 60 + minutes))
            .map(DayBoundary::Fixed)
            .ok_or_else(invalid)
    }
}

/// Builds a fixed offset from signed minutes east of UTC.
///
/// Returns `None` outside the open range of one day either side.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if minutes.abs() >= 24 * 60 {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}
