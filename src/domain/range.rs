//! Range-selection geometry.
//!
//! Bounds may arrive unordered, and either side may be absent while a
//! selection is in progress (the hovered or focused cell supplies the
//! provisional other end). Everything here normalizes bounds first, and a
//! pair of equal bounds counts as no range at all: a single-day selection
//! renders no range styling.

use chrono::NaiveDate;

/// Per-cell edge flags used for border rendering.
///
/// An edge is set exactly when the cell is in range and its neighbor in
/// that direction is not. Missing neighbors at grid boundaries count as
/// out of range, so boundary cells get their outer edges set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeEdges {
    /// No in-range neighbor above.
    pub top: bool,
    /// No in-range neighbor below.
    pub bottom: bool,
    /// No in-range neighbor toward the start of the row.
    pub left: bool,
    /// No in-range neighbor toward the end of the row.
    pub right: bool,
}

/// Orders a pair of optional bounds, discarding incomplete or single-day
/// pairs.
#[must_use]
pub fn normalized_bounds(
    a: Option<NaiveDate>,
    b: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    match (a, b) {
        (Some(a), Some(b)) if a != b => Some((a.min(b), a.max(b))),
        _ => None,
    }
}

/// Whether `date` lies inclusively between the ordered bounds.
#[must_use]
pub fn is_in_range(date: NaiveDate, a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    normalized_bounds(a, b).is_some_and(|(start, end)| start <= date && date <= end)
}

/// Edge flags for the cell at `(row, col)` of a date matrix.
///
/// Neighbors are looked up positionally in the same row or column, O(1)
/// per cell; the matrix is never scanned as a whole.
#[must_use]
pub fn range_edges<const N: usize>(
    grid: &[[NaiveDate; N]],
    row: usize,
    col: usize,
    a: Option<NaiveDate>,
    b: Option<NaiveDate>,
) -> RangeEdges {
    let Some((start, end)) = normalized_bounds(a, b) else {
        return RangeEdges::default();
    };
    let in_range = |date: NaiveDate| start <= date && date <= end;

    if !grid
        .get(row)
        .and_then(|r| r.get(col))
        .copied()
        .is_some_and(in_range)
    {
        return RangeEdges::default();
    }

    let neighbor_in_range = |r: Option<usize>, c: Option<usize>| {
        let (Some(r), Some(c)) = (r, c) else {
            return false;
        };
        grid.get(r).and_then(|row| row.get(c)).copied().is_some_and(in_range)
    };

    RangeEdges {
        top: !neighbor_in_range(row.checked_sub(1), Some(col)),
        bottom: !neighbor_in_range(row.checked_add(1), Some(col)),
        left: !neighbor_in_range(Some(row), col.checked_sub(1)),
        right: !neighbor_in_range(Some(row), col.checked_add(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use test_case::test_case;

    use crate::domain::grid::{PadOrder, padded_month_weeks};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn bounds_are_order_independent() {
        let low = d(2022, 7, 5);
        let high = d(2022, 7, 20);
        assert_eq!(normalized_bounds(Some(high), Some(low)), Some((low, high)));
        assert!(is_in_range(d(2022, 7, 10), Some(high), Some(low)));
    }

    #[test_case(None, Some(d(2022, 7, 20)) ; "missing_start")]
    #[test_case(Some(d(2022, 7, 5)), None ; "missing_end")]
    #[test_case(Some(d(2022, 7, 5)), Some(d(2022, 7, 5)) ; "single_day")]
    fn incomplete_pairs_are_no_range(a: Option<NaiveDate>, b: Option<NaiveDate>) {
        assert_eq!(normalized_bounds(a, b), None);
        assert!(!is_in_range(d(2022, 7, 5), a, b));
    }

    #[test]
    fn range_is_inclusive_of_both_bounds() {
        let a = Some(d(2022, 7, 5));
        let b = Some(d(2022, 7, 20));
        assert!(is_in_range(d(2022, 7, 5), a, b));
        assert!(is_in_range(d(2022, 7, 20), a, b));
        assert!(!is_in_range(d(2022, 7, 4), a, b));
        assert!(!is_in_range(d(2022, 7, 21), a, b));
    }

    #[test]
    fn edges_at_grid_boundaries_default_to_set() {
        // Range covers every visible cell of the padded July 2022 grid.
        let weeks = padded_month_weeks(d(2022, 7, 15), Weekday::Sun, PadOrder::After);
        let grid: Vec<[NaiveDate; 7]> = weeks;
        let a = Some(grid[0][0]);
        let b = Some(grid[5][6]);

        let top_left = range_edges(&grid, 0, 0, a, b);
        assert!(top_left.top && top_left.left);
        assert!(!top_left.bottom && !top_left.right);

        let bottom_right = range_edges(&grid, 5, 6, a, b);
        assert!(bottom_right.bottom && bottom_right.right);
        assert!(!bottom_right.top && !bottom_right.left);

        let interior = range_edges(&grid, 2, 3, a, b);
        assert_eq!(interior, RangeEdges::default());
    }

    #[test]
    fn edges_track_interior_range_borders() {
        let weeks = padded_month_weeks(d(2022, 7, 15), Weekday::Sun, PadOrder::After);
        let grid: Vec<[NaiveDate; 7]> = weeks;
        // July 12 (Tue) through July 14 (Thu): a single-row run.
        let a = Some(d(2022, 7, 12));
        let b = Some(d(2022, 7, 14));

        let first = range_edges(&grid, 2, 2, a, b);
        assert!(first.left && first.top && first.bottom && !first.right);

        let last = range_edges(&grid, 2, 4, a, b);
        assert!(last.right && last.top && last.bottom && !last.left);

        let outside = range_edges(&grid, 2, 5, a, b);
        assert_eq!(outside, RangeEdges::default());
    }
}
