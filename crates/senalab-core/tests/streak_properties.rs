//! Property tests for the login streak policy.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use senalab_core::streak::{evaluate, offset_from_minutes, DayBoundary, StreakChange, StreakPolicy};

// 2000-01-01 .. 2100-01-01
const MIN_SECS: i64 = 946_684_800;
const MAX_SECS: i64 = 4_102_444_800;

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_SECS..MAX_SECS, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
}

fn fixed_boundary() -> impl Strategy<Value = DayBoundary> {
    prop_oneof![
        Just(DayBoundary::Utc),
        (-1439i32..=1439).prop_map(|m| DayBoundary::Fixed(offset_from_minutes(m).unwrap())),
    ]
}

/// Two instants `days` calendar days apart under `boundary`, at arbitrary times of day.
fn days_apart(
    boundary: DayBoundary,
    anchor: DateTime<Utc>,
    days: i64,
    first_ms: i64,
    second_ms: i64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = boundary.start_of_day(anchor);
    (
        start + Duration::milliseconds(first_ms),
        start + Duration::days(days) + Duration::milliseconds(second_ms),
    )
}

const DAY_MS: i64 = 86_400_000;

proptest! {
    #[test]
    fn first_login_always_starts_at_one(streak in any::<u32>(), now in instant()) {
        let out = evaluate(streak, None, now);
        prop_assert_eq!(out.new_streak, 1);
        prop_assert!(out.should_persist);
        prop_assert_eq!(out.change, StreakChange::Started);
    }

    #[test]
    fn same_calendar_day_is_idempotent(
        boundary in fixed_boundary(),
        streak in any::<u32>(),
        anchor in instant(),
        a in 0..DAY_MS,
        b in 0..DAY_MS,
    ) {
        let (last, now) = days_apart(boundary, anchor, 0, a, b);
        let out = StreakPolicy::new(boundary).evaluate(streak, Some(last), now);
        prop_assert_eq!(out.new_streak, streak);
        prop_assert!(!out.should_persist);
    }

    #[test]
    fn consecutive_days_increment(
        boundary in fixed_boundary(),
        streak in 0u32..1_000_000,
        anchor in instant(),
        a in 0..DAY_MS,
        b in 0..DAY_MS,
    ) {
        let (last, now) = days_apart(boundary, anchor, 1, a, b);
        let out = StreakPolicy::new(boundary).evaluate(streak, Some(last), now);
        prop_assert_eq!(out.new_streak, streak + 1);
        prop_assert!(out.should_persist);
    }

    #[test]
    fn gaps_of_two_or_more_days_reset(
        boundary in fixed_boundary(),
        streak in any::<u32>(),
        anchor in instant(),
        days in 2i64..5000,
        a in 0..DAY_MS,
        b in 0..DAY_MS,
    ) {
        let (last, now) = days_apart(boundary, anchor, days, a, b);
        let out = StreakPolicy::new(boundary).evaluate(streak, Some(last), now);
        prop_assert_eq!(out.new_streak, 1);
        prop_assert!(out.should_persist);
        prop_assert_eq!(out.change, StreakChange::Reset);
    }

    #[test]
    fn last_login_on_a_later_day_resets(
        boundary in fixed_boundary(),
        streak in any::<u32>(),
        anchor in instant(),
        days in 1i64..5000,
        a in 0..DAY_MS,
        b in 0..DAY_MS,
    ) {
        let (now, last) = days_apart(boundary, anchor, days, a, b);
        let out = StreakPolicy::new(boundary).evaluate(streak, Some(last), now);
        prop_assert_eq!((out.new_streak, out.should_persist), (1, true));
    }

    #[test]
    fn start_of_day_is_idempotent_and_not_after_instant(
        boundary in fixed_boundary(),
        t in instant(),
    ) {
        let start = boundary.start_of_day(t);
        prop_assert!(start <= t);
        prop_assert!(t - start < Duration::days(1));
        prop_assert_eq!(boundary.start_of_day(start), start);
    }
}
