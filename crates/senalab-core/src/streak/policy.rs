//! Daily login streak policy.
//!
//! Given the stored streak and last-login instant plus "now", decides the new
//! streak and whether the record must be written back. The policy performs no
//! I/O; the caller fetches the record, evaluates, and writes conditionally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::day::DayBoundary;

/// Streak-relevant subset of a user profile.
///
/// `streak_count` is 0 before the first recorded login and at least 1 after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStreakRecord {
    pub streak_count: u32,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Which branch of the policy produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// No previous login on record
    Started,
    /// Already logged in on this calendar day
    Unchanged,
    /// Previous login was on the preceding calendar day
    Extended,
    /// Gap of two or more days, or a last login dated in the future
    Reset,
}

/// Result of evaluating one login event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakOutcome {
    pub new_streak: u32,
    /// When true the caller must write `{streak: new_streak, last_login: now}`.
    pub should_persist: bool,
    pub change: StreakChange,
}

/// Stateless streak evaluator bound to a day-boundary policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakPolicy {
    boundary: DayBoundary,
}

impl StreakPolicy {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }

    pub fn boundary(&self) -> DayBoundary {
        self.boundary
    }

    /// Evaluate a login at `now` against the stored streak state.
    ///
    /// Streaks are `u32`, so a negative input cannot be expressed; the
    /// increment saturates at `u32::MAX`.
    pub fn evaluate(
        &self,
        current_streak: u32,
        last_login_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> StreakOutcome {
        let Some(last_login_at) = last_login_at else {
            return StreakOutcome {
                new_streak: 1,
                should_persist: true,
                change: StreakChange::Started,
            };
        };

        match self.boundary.gap_days(last_login_at, now) {
            0 => StreakOutcome {
                new_streak: current_streak,
                should_persist: false,
                change: StreakChange::Unchanged,
            },
            1 => StreakOutcome {
                new_streak: current_streak.saturating_add(1),
                should_persist: true,
                change: StreakChange::Extended,
            },
            _ => StreakOutcome {
                new_streak: 1,
                should_persist: true,
                change: StreakChange::Reset,
            },
        }
    }

    pub fn evaluate_record(&self, record: &UserStreakRecord, now: DateTime<Utc>) -> StreakOutcome {
        self.evaluate(record.streak_count, record.last_login_at, now)
    }
}

/// Evaluate with the default (UTC) day boundary.
pub fn evaluate(
    current_streak: u32,
    last_login_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StreakOutcome {
    StreakPolicy::default().evaluate(current_streak, last_login_at, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::day::offset_from_minutes;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn late_night_then_early_morning_extends() {
        let out = evaluate(5, Some(at("2024-01-10T23:00:00Z")), at("2024-01-11T00:30:00Z"));
        assert_eq!(out.new_streak, 6);
        assert!(out.should_persist);
        assert_eq!(out.change, StreakChange::Extended);
    }

    #[test]
    fn second_login_same_day_is_a_no_op() {
        let out = evaluate(5, Some(at("2024-01-10T08:00:00Z")), at("2024-01-10T20:00:00Z"));
        assert_eq!(out.new_streak, 5);
        assert!(!out.should_persist);
        assert_eq!(out.change, StreakChange::Unchanged);
    }

    #[test]
    fn nine_day_gap_resets() {
        let out = evaluate(5, Some(at("2024-01-01T00:00:00Z")), at("2024-01-10T00:00:00Z"));
        assert_eq!((out.new_streak, out.should_persist), (1, true));
        assert_eq!(out.change, StreakChange::Reset);
    }

    #[test]
    fn first_login_starts_at_one() {
        let out = evaluate(0, None, at("2024-06-01T12:00:00Z"));
        assert_eq!((out.new_streak, out.should_persist), (1, true));
        assert_eq!(out.change, StreakChange::Started);
    }

    #[test]
    fn one_second_apart_across_midnight_counts_as_one_day() {
        let out = evaluate(3, Some(at("2024-01-10T23:59:59Z")), at("2024-01-11T00:00:01Z"));
        assert_eq!((out.new_streak, out.should_persist), (4, true));
    }

    #[test]
    fn almost_a_full_day_within_one_calendar_day_is_unchanged() {
        let out = evaluate(3, Some(at("2024-01-10T00:00:01Z")), at("2024-01-10T23:59:59Z"));
        assert_eq!((out.new_streak, out.should_persist), (3, false));
    }

    #[test]
    fn last_login_in_the_future_resets() {
        let out = evaluate(7, Some(at("2024-01-12T09:00:00Z")), at("2024-01-10T09:00:00Z"));
        assert_eq!((out.new_streak, out.should_persist), (1, true));
        assert_eq!(out.change, StreakChange::Reset);
    }

    #[test]
    fn future_login_on_next_day_also_resets() {
        let out = evaluate(7, Some(at("2024-01-11T09:00:00Z")), at("2024-01-10T09:00:00Z"));
        assert_eq!(out.change, StreakChange::Reset);
    }

    #[test]
    fn increment_saturates() {
        let out = evaluate(u32::MAX, Some(at("2024-01-10T12:00:00Z")), at("2024-01-11T12:00:00Z"));
        assert_eq!(out.new_streak, u32::MAX);
        assert!(out.should_persist);
    }

    #[test]
    fn boundary_choice_changes_the_outcome() {
        // 23:00 and 01:00 UTC are one UTC day apart but the same evening in UTC-6.
        let last = at("2024-01-10T23:00:00Z");
        let now = at("2024-01-11T01:00:00Z");

        let utc = StreakPolicy::new(DayBoundary::Utc).evaluate(2, Some(last), now);
        assert_eq!(utc.change, StreakChange::Extended);

        let mexico = StreakPolicy::new(DayBoundary::Fixed(offset_from_minutes(-360).unwrap()))
            .evaluate(2, Some(last), now);
        assert_eq!(mexico.change, StreakChange::Unchanged);
        assert_eq!(mexico.new_streak, 2);
    }

    #[test]
    fn evaluate_record_uses_snapshot_fields() {
        let record = UserStreakRecord {
            streak_count: 9,
            last_login_at: Some(at("2024-03-01T10:00:00Z")),
        };
        let out = StreakPolicy::default().evaluate_record(&record, at("2024-03-02T10:00:00Z"));
        assert_eq!(out.new_streak, 10);
    }
}
