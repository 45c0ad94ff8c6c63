//! Calendar grid construction.
//!
//! Grids are plain date matrices. Day granularity yields one row per week
//! with seven columns, always full weeks, so cells may belong to adjacent
//! months; month granularity yields a fixed 4×3 matrix of the year's
//! months. The padded builder guarantees six rows so side-by-side range
//! picker pages never jitter in height.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::date::{
    add_months, days_from_week_start, same_month, same_year, start_of_month,
};
use crate::domain::Granularity;

/// Number of columns in a week row.
pub const WEEK_LEN: usize = 7;

/// Number of rows in a padded month grid.
pub const PADDED_WEEK_ROWS: usize = 6;

/// Which side of the month receives padding weeks in the six-row builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadOrder {
    /// Pad with the previous month's trailing weeks.
    Before,
    /// Pad with the next month's leading weeks.
    After,
}

/// One week of dates, starting on the configured start-of-week day.
pub type WeekRow = [NaiveDate; WEEK_LEN];

fn week_starting(start: NaiveDate) -> WeekRow {
    let mut row = [start; WEEK_LEN];
    for (offset, cell) in row.iter_mut().enumerate() {
        *cell = start + Duration::days(offset as i64);
    }
    row
}

/// The full weeks of `base`'s month, honoring `start_of_week`.
///
/// Produces four to six rows depending on the month.
#[must_use]
pub fn month_weeks(base: NaiveDate, start_of_week: Weekday) -> Vec<WeekRow> {
    let first = start_of_month(base);
    let last = start_of_month(add_months(first, 1)) - Duration::days(1);
    let mut week_start = first - Duration::days(i64::from(days_from_week_start(first, start_of_week)));

    let mut weeks = Vec::new();
    while week_start <= last {
        weeks.push(week_starting(week_start));
        week_start += Duration::days(WEEK_LEN as i64);
    }
    weeks
}

/// Exactly six week rows for `base`'s month, padded on the requested side
/// with the neighboring month's weeks.
#[must_use]
pub fn padded_month_weeks(
    base: NaiveDate,
    start_of_week: Weekday,
    pad: PadOrder,
) -> Vec<WeekRow> {
    let mut weeks = month_weeks(base, start_of_week);
    while weeks.len() < PADDED_WEEK_ROWS {
        match pad {
            PadOrder::Before => {
                let first = weeks[0][0] - Duration::days(WEEK_LEN as i64);
                weeks.insert(0, week_starting(first));
            }
            PadOrder::After => {
                let next = weeks[weeks.len() - 1][0] + Duration::days(WEEK_LEN as i64);
                weeks.push(week_starting(next));
            }
        }
    }
    weeks
}

/// The 4×3 matrix of first-of-month dates for `base`'s year.
#[must_use]
pub fn year_months(base: NaiveDate) -> [[NaiveDate; 3]; 4] {
    let january = NaiveDate::from_ymd_opt(base.year(), 1, 1).unwrap_or(base);
    std::array::from_fn(|row| {
        std::array::from_fn(|col| add_months(january, (row * 3 + col) as i32))
    })
}

/// Whether a cell date belongs to the currently displayed page.
#[must_use]
pub fn in_page(date: NaiveDate, base: NaiveDate, granularity: Granularity) -> bool {
    match granularity {
        Granularity::Day => same_month(date, base),
        Granularity::Month => same_year(date, base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weeks_cover_month_with_full_rows() {
        let weeks = month_weeks(d(2022, 7, 15), Weekday::Sun);
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][0], d(2022, 6, 26));
        assert_eq!(weeks[5][6], d(2022, 8, 6));
        for row in &weeks {
            assert_eq!(row[0].weekday(), Weekday::Sun);
            for pair in row.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn weeks_honor_start_of_week() {
        let weeks = month_weeks(d(2022, 7, 15), Weekday::Mon);
        assert_eq!(weeks[0][0], d(2022, 6, 27));
        assert_eq!(weeks[0][0].weekday(), Weekday::Mon);
        assert_eq!(weeks.len(), 5);
    }

    // Months with four, five, and six natural weeks all pad to six rows.
    #[test_case(d(2021, 2, 15), Weekday::Mon ; "four_week_month")]
    #[test_case(d(2021, 7, 15), Weekday::Sun ; "five_week_month")]
    #[test_case(d(2021, 5, 15), Weekday::Sun ; "six_week_month")]
    fn padded_grid_is_six_by_seven(base: NaiveDate, start_of_week: Weekday) {
        for pad in [PadOrder::Before, PadOrder::After] {
            let weeks = padded_month_weeks(base, start_of_week, pad);
            assert_eq!(weeks.len(), PADDED_WEEK_ROWS);
            for row in &weeks {
                assert_eq!(row.len(), WEEK_LEN);
            }
        }
    }

    #[test]
    fn padding_side_matches_pad_order() {
        let natural = month_weeks(d(2021, 2, 15), Weekday::Mon);
        assert_eq!(natural.len(), 4);

        let before = padded_month_weeks(d(2021, 2, 15), Weekday::Mon, PadOrder::Before);
        assert_eq!(before[2..], natural[..]);
        assert_eq!(before[1][0], d(2021, 1, 25));
        assert_eq!(before[0][0], d(2021, 1, 18));

        let after = padded_month_weeks(d(2021, 2, 15), Weekday::Mon, PadOrder::After);
        assert_eq!(after[..4], natural[..]);
        assert_eq!(after[4][0], d(2021, 3, 1));
        assert_eq!(after[5][0], d(2021, 3, 8));
    }

    #[test]
    fn year_matrix_is_four_by_three() {
        let months = year_months(d(2022, 7, 15));
        assert_eq!(months[0][0], d(2022, 1, 1));
        assert_eq!(months[1][0], d(2022, 4, 1));
        assert_eq!(months[3][2], d(2022, 12, 1));
    }

    #[test]
    fn page_membership_follows_granularity() {
        assert!(in_page(d(2022, 7, 1), d(2022, 7, 31), Granularity::Day));
        assert!(!in_page(d(2022, 8, 1), d(2022, 7, 31), Granularity::Day));
        assert!(in_page(d(2022, 1, 1), d(2022, 7, 31), Granularity::Month));
        assert!(!in_page(d(2023, 1, 1), d(2022, 7, 31), Granularity::Month));
    }
}
