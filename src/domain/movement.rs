//! Bounded movement across enabled dates.
//!
//! Movement steps a date by a fixed increment until the caller-supplied
//! enabled predicate accepts a candidate. The search horizon is one year
//! for day steps and ten years for month steps; when it is exhausted the
//! original date is returned unchanged. That fallback is a defined result,
//! not an error, so callers never handle a failure path from navigation.

use chrono::{Duration, NaiveDate};

use crate::domain::date::{add_months, same_month, same_year, start_of_month, start_of_year};

/// Search horizon for day-granularity movement, in days.
const DAY_HORIZON: i64 = 366;

/// Search horizon for month-granularity movement, in months.
const MONTH_HORIZON: i32 = 120;

/// Caller-supplied predicate deciding which dates are interactive.
///
/// Must be pure and stable across calls within one navigation session.
pub type EnabledPredicate<'a> = &'a dyn Fn(NaiveDate) -> bool;

/// Steps `start` by `step` days repeatedly until an enabled date is found.
///
/// Returns `start` unchanged when `step` is zero or no enabled date exists
/// within one year of `start`.
#[must_use]
pub fn move_day(start: NaiveDate, is_enabled: EnabledPredicate<'_>, step: i64) -> NaiveDate {
    if step == 0 {
        return start;
    }
    let mut walked = 0;
    loop {
        walked += step;
        if walked.abs() > DAY_HORIZON {
            return start;
        }
        let Some(candidate) = start.checked_add_signed(Duration::days(walked)) else {
            return start;
        };
        if is_enabled(candidate) {
            return candidate;
        }
    }
}

/// Steps `start` by `step` calendar months until an enabled date is found.
///
/// Month addition clamps the day-of-month to the target month's length.
/// Returns `start` unchanged when `step` is zero or no enabled date exists
/// within ten years of `start`.
#[must_use]
pub fn move_month(start: NaiveDate, is_enabled: EnabledPredicate<'_>, step: i32) -> NaiveDate {
    if step == 0 {
        return start;
    }
    let mut walked = 0;
    loop {
        walked += step;
        if walked.abs() > MONTH_HORIZON {
            return start;
        }
        let candidate = add_months(start, walked);
        if is_enabled(candidate) {
            return candidate;
        }
    }
}

/// The first enabled date within `date`'s month.
///
/// Falls back to the literal first-of-month when that date is itself
/// enabled or when no enabled date exists inside the month. The result is
/// always within `date`'s month, never a neighboring one.
#[must_use]
pub fn base_day(date: NaiveDate, is_enabled: EnabledPredicate<'_>) -> NaiveDate {
    let start = start_of_month(date);
    if is_enabled(start) {
        return start;
    }
    let candidate = move_day(start, is_enabled, 1);
    if same_month(candidate, start) { candidate } else { start }
}

/// The first enabled month within `date`'s year, as a first-of-month date.
///
/// Same containment guarantee as [`base_day`], per year instead of month.
#[must_use]
pub fn base_month(date: NaiveDate, is_enabled: EnabledPredicate<'_>) -> NaiveDate {
    let start = start_of_year(date);
    if is_enabled(start) {
        return start;
    }
    let candidate = move_month(start, is_enabled, 1);
    if same_year(candidate, start) { candidate } else { start }
}
