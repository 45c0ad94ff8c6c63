//! Focus-target resolution for calendar grids.
//!
//! At most one cell per visible grid may hold keyboard focus. The target
//! is resolved through a fallback chain: explicit focus, then the selected
//! date, then today, then the first enabled date of the page. Dates off
//! the displayed page never win, and a disabled date only participates
//! when it carries a disabled reason (focusable and announceable, but not
//! selectable).

use chrono::{Duration, NaiveDate};

use crate::domain::Granularity;
use crate::domain::date::{add_months, start_of_month, start_of_year};
use crate::domain::grid::in_page;
use crate::domain::movement::EnabledPredicate;

/// Optional caller-supplied reason why a date is disabled.
///
/// A disabled date with a reason stays focusable so the reason can be
/// announced; it is never selectable.
pub type DisabledReasonFn<'a> = &'a dyn Fn(NaiveDate) -> Option<String>;

/// Whether a cell may receive keyboard focus.
#[must_use]
pub fn is_focusable(
    date: NaiveDate,
    is_enabled: EnabledPredicate<'_>,
    disabled_reason: DisabledReasonFn<'_>,
) -> bool {
    is_enabled(date) || disabled_reason(date).is_some()
}

/// Dates of the displayed page in order: the days of the base month, or
/// the months of the base year.
fn page_dates(base: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    match granularity {
        Granularity::Day => {
            let mut dates = Vec::with_capacity(31);
            let mut day = start_of_month(base);
            while in_page(day, base, Granularity::Day) {
                dates.push(day);
                day += Duration::days(1);
            }
            dates
        }
        Granularity::Month => {
            let january = start_of_year(base);
            (0..12).map(|offset| add_months(january, offset)).collect()
        }
    }
}

/// Resolves the single focus target for the displayed page.
#[must_use]
pub fn focusable_date(
    explicit: Option<NaiveDate>,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    base: NaiveDate,
    granularity: Granularity,
    is_enabled: EnabledPredicate<'_>,
    disabled_reason: DisabledReasonFn<'_>,
) -> Option<NaiveDate> {
    let on_page = |date: NaiveDate| in_page(date, base, granularity);

    if let Some(date) = explicit {
        if on_page(date) && is_focusable(date, is_enabled, disabled_reason) {
            return Some(date);
        }
    }
    if let Some(date) = selected {
        if on_page(date) && is_enabled(date) {
            return Some(date);
        }
    }
    if on_page(today) && is_enabled(today) {
        return Some(today);
    }
    page_dates(base, granularity)
        .into_iter()
        .find(|&date| is_enabled(date))
}
