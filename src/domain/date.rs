//! Calendar-day values and the public value contract.
//!
//! All calendar logic operates on [`chrono::NaiveDate`]: plain calendar days
//! compared by day identity, with no time-of-day significance.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::domain::errors::DateError;

/// The selectable unit of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Individual days are selectable; pages are months.
    #[default]
    Day,
    /// Whole months are selectable; pages are years.
    Month,
}

/// Reading direction used to resolve inline (left/right) keys.
///
/// Always passed explicitly by the caller; the navigation reducer never
/// inspects a rendered element to discover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    /// Left-to-right reading order.
    #[default]
    LeftToRight,
    /// Right-to-left reading order.
    RightToLeft,
}

/// A parsed calendar value, the widget-facing wire contract.
///
/// Day granularity accepts `YYYY-MM-DD`; month granularity accepts
/// `YYYY-MM` (and a full date, which is normalized to the first of its
/// month). Formatting reproduces the canonical string for the granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    date: NaiveDate,
    granularity: Granularity,
}

impl DateValue {
    /// Parses a raw value string against a granularity.
    ///
    /// # Errors
    /// Returns [`DateError::InvalidValue`] when the string does not parse.
    /// Callers that follow the calendar contract treat that as "no
    /// selection" rather than a failure.
    pub fn parse(raw: &str, granularity: Granularity) -> Result<Self, DateError> {
        let date = match granularity {
            Granularity::Day => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| DateError::invalid_value(raw))?,
            Granularity::Month => {
                let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
                    .map_err(|_| DateError::invalid_value(raw))?;
                start_of_month(parsed)
            }
        };
        Ok(Self { date, granularity })
    }

    /// Wraps an already-resolved date, normalizing month values to the
    /// first of their month.
    #[must_use]
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        let date = match granularity {
            Granularity::Day => date,
            Granularity::Month => start_of_month(date),
        };
        Self { date, granularity }
    }

    /// The resolved calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The granularity the value was parsed under.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl std::fmt::Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.granularity {
            Granularity::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
            Granularity::Month => write!(f, "{}", self.date.format("%Y-%m")),
        }
    }
}

/// The first day of `date`'s month.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The first day of `date`'s year.
#[must_use]
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Whether two dates fall in the same calendar month.
#[must_use]
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Whether two dates fall in the same calendar year.
#[must_use]
pub fn same_year(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year()
}

/// Adds `months` calendar months, clamping the day-of-month so the result
/// stays inside the target month (Jan 31 + 1 month = Feb 28/29).
#[must_use]
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let result = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    result.unwrap_or(date)
}

/// Resolves a start-of-week index from the public contract (0 = Sunday,
/// 6 = Saturday).
///
/// # Errors
/// Returns [`DateError::InvalidStartOfWeek`] for indexes above 6.
pub fn start_of_week_from_index(index: u8) -> Result<Weekday, DateError> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(DateError::invalid_start_of_week(index)),
    }
}

/// The number of days from the configured start of week to `date`'s
/// weekday, in `0..7`.
#[must_use]
pub fn days_from_week_start(date: NaiveDate, start_of_week: Weekday) -> u32 {
    (date.weekday().num_days_from_sunday() + 7 - start_of_week.num_days_from_sunday()) % 7
}
