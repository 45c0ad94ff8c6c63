//! Date-range picker widget.
//!
//! Two side-by-side month pages, both padded to six week rows so the pair
//! never jitters in height: the left page pads with the previous month's
//! weeks, the right page with the next month's. Selection is click-order
//! independent; while only one bound is set, the focused cell acts as the
//! provisional other end.

use chrono::{Datelike, NaiveDate, Weekday};
use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::date::{DateValue, Granularity, TextDirection, add_months, same_month};
use crate::domain::focus::{DisabledReasonFn, focusable_date, is_focusable};
use crate::domain::grid::{PadOrder, WeekRow, padded_month_weeks};
use crate::domain::movement::EnabledPredicate;
use crate::domain::navigation::{NavOutcome, reduce};
use crate::domain::range::{is_in_range, range_edges};
use crate::presentation::theme::CalendarStyle;
use crate::presentation::widgets::calendar::weekday_label;

/// Actions produced by range-picker key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePickerAction {
    /// The first bound of a new selection was set.
    SelectionStarted(NaiveDate),
    /// Both bounds are set; carries the ordered public values.
    Changed {
        /// Start of the ordered range.
        start: DateValue,
        /// End of the ordered range.
        end: DateValue,
    },
    /// Focus moved; the pages were already shifted when `page_changed` is
    /// set.
    FocusMoved {
        /// The new focus target.
        date: NaiveDate,
        /// Whether the displayed pages changed.
        page_changed: bool,
    },
}

/// State for the range picker: two month pages anchored at `base`.
#[derive(Debug, Clone)]
pub struct DateRangePickerState {
    base: NaiveDate,
    focused: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    start_of_week: Weekday,
    direction: TextDirection,
    today: NaiveDate,
}

impl DateRangePickerState {
    /// Creates a state paged to today with no selection.
    #[must_use]
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            base: today,
            focused: None,
            start: None,
            end: None,
            start_of_week: Weekday::Sun,
            direction: TextDirection::LeftToRight,
            today,
        }
    }

    /// Builds with a start-of-week day.
    #[must_use]
    pub const fn with_start_of_week(mut self, start_of_week: Weekday) -> Self {
        self.start_of_week = start_of_week;
        self
    }

    /// Builds with a reading direction for key resolution.
    #[must_use]
    pub const fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Builds with a fixed "today", primarily for tests.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Replaces the selection from raw value strings.
    ///
    /// Either value failing to parse clears that bound; the page follows
    /// the start bound when present.
    pub fn set_values(&mut self, start: &str, end: &str) {
        self.start = DateValue::parse(start, Granularity::Day).ok().map(|v| v.date());
        self.end = DateValue::parse(end, Granularity::Day).ok().map(|v| v.date());
        if let Some(start) = self.start {
            self.base = start;
        }
    }

    /// The anchor date of the left page.
    #[must_use]
    pub const fn base(&self) -> NaiveDate {
        self.base
    }

    /// The explicit focus target, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<NaiveDate> {
        self.focused
    }

    /// The selection bounds in click order.
    #[must_use]
    pub const fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start, self.end)
    }

    /// The bounds used for rendering: a lone start bound borrows the
    /// focused cell as its provisional other end.
    #[must_use]
    pub fn effective_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match (self.start, self.end) {
            (Some(start), None) => (Some(start), self.focused),
            bounds => bounds,
        }
    }

    /// Pages both calendars forward one month.
    pub fn next_page(&mut self) {
        self.base = add_months(self.base, 1);
    }

    /// Pages both calendars backward one month.
    pub fn previous_page(&mut self) {
        self.base = add_months(self.base, -1);
    }

    fn visible(&self, date: NaiveDate) -> bool {
        same_month(date, self.base) || same_month(date, add_months(self.base, 1))
    }

    /// The single focus target across both pages.
    #[must_use]
    pub fn focus_target(
        &self,
        is_enabled: EnabledPredicate<'_>,
        disabled_reason: DisabledReasonFn<'_>,
    ) -> Option<NaiveDate> {
        // Explicit focus is judged against both visible months before any
        // fallback runs; a left-page selection must not shadow focus that
        // has crossed into the right page.
        if let Some(focused) = self.focused {
            if self.visible(focused) && is_focusable(focused, is_enabled, disabled_reason) {
                return Some(focused);
            }
        }
        focusable_date(
            None,
            self.start,
            self.today,
            self.base,
            Granularity::Day,
            is_enabled,
            disabled_reason,
        )
        .or_else(|| {
            focusable_date(
                None,
                self.start,
                self.today,
                add_months(self.base, 1),
                Granularity::Day,
                is_enabled,
                disabled_reason,
            )
        })
    }

    /// Reduces one key event against the pair of grids.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        is_enabled: EnabledPredicate<'_>,
        disabled_reason: DisabledReasonFn<'_>,
    ) -> Option<DateRangePickerAction> {
        let target = self.focus_target(is_enabled, disabled_reason);
        match reduce(
            key,
            Granularity::Day,
            self.direction,
            self.base,
            target,
            is_enabled,
            disabled_reason,
        ) {
            NavOutcome::Ignored => None,
            NavOutcome::Selected(date) => {
                self.focused = None;
                match (self.start, self.end) {
                    (Some(start), None) => {
                        self.end = Some(date);
                        Some(DateRangePickerAction::Changed {
                            start: DateValue::from_date(start.min(date), Granularity::Day),
                            end: DateValue::from_date(start.max(date), Granularity::Day),
                        })
                    }
                    _ => {
                        self.start = Some(date);
                        self.end = None;
                        Some(DateRangePickerAction::SelectionStarted(date))
                    }
                }
            }
            NavOutcome::Focused { date, .. } => {
                // Page membership is judged against both visible months,
                // not just the reducer's single base.
                let page_changed = !self.visible(date);
                if page_changed {
                    self.base = date;
                }
                self.focused = Some(date);
                Some(DateRangePickerAction::FocusMoved { date, page_changed })
            }
        }
    }
}

impl Default for DateRangePickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Date-range picker widget.
pub struct DateRangePicker<'a> {
    is_enabled: EnabledPredicate<'a>,
    disabled_reason: DisabledReasonFn<'a>,
    style: CalendarStyle,
}

impl<'a> DateRangePicker<'a> {
    /// Creates a picker with every date enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_enabled: &|_| true,
            disabled_reason: &|_| None,
            style: CalendarStyle::default(),
        }
    }

    /// Builds with an enabled-date predicate.
    #[must_use]
    pub fn with_enabled(mut self, is_enabled: EnabledPredicate<'a>) -> Self {
        self.is_enabled = is_enabled;
        self
    }

    /// Builds with a disabled-reason function.
    #[must_use]
    pub fn with_disabled_reason(mut self, disabled_reason: DisabledReasonFn<'a>) -> Self {
        self.disabled_reason = disabled_reason;
        self
    }

    /// Builds with a style bundle.
    #[must_use]
    pub fn with_style(mut self, style: CalendarStyle) -> Self {
        self.style = style;
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn cell_span(
        &self,
        state: &DateRangePickerState,
        grid: &[WeekRow],
        row: usize,
        col: usize,
        page: NaiveDate,
        target: Option<NaiveDate>,
    ) -> Span<'static> {
        let date = grid[row][col];
        let (a, b) = state.effective_bounds();
        let in_range = is_in_range(date, a, b);
        let edges = range_edges(grid, row, col, a, b);
        let on_page = same_month(date, page);
        let enabled = (self.is_enabled)(date);

        let mut style = if state.start == Some(date) || state.end == Some(date) {
            self.style.selected
        } else if in_range && (edges.top || edges.bottom || edges.left || edges.right) {
            self.style.range_edge
        } else if in_range {
            self.style.in_range
        } else if !enabled && (self.disabled_reason)(date).is_some() {
            self.style.disabled_with_reason
        } else if !enabled {
            self.style.disabled
        } else if !on_page {
            self.style.adjacent
        } else if date == state.today {
            self.style.today
        } else {
            self.style.day
        };
        if target == Some(date) && on_page {
            style = style.patch(self.style.focused);
        }
        Span::styled(format!("{:>3} ", date.day()), style)
    }

    fn page_lines(
        &self,
        state: &DateRangePickerState,
        page: NaiveDate,
        pad: PadOrder,
        target: Option<NaiveDate>,
    ) -> Vec<Line<'static>> {
        let grid = padded_month_weeks(page, state.start_of_week, pad);

        let mut lines = Vec::new();
        lines.push(Line::styled(
            page.format("%B %Y").to_string(),
            self.style.header,
        ));

        let mut header = Vec::new();
        let mut weekday = state.start_of_week;
        for _ in 0..7 {
            header.push(Span::styled(
                format!("{:>3} ", weekday_label(weekday)),
                self.style.weekday,
            ));
            weekday = weekday.succ();
        }
        lines.push(Line::from(header));

        for row in 0..grid.len() {
            let spans = (0..grid[row].len())
                .map(|col| self.cell_span(state, &grid, row, col, page, target))
                .collect::<Vec<_>>();
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Default for DateRangePicker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWidget for DateRangePicker<'_> {
    type State = DateRangePickerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let target = state.focus_target(self.is_enabled, self.disabled_reason);
        let pages = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left = self.page_lines(state, state.base, PadOrder::Before, target);
        let right = self.page_lines(state, add_months(state.base, 1), PadOrder::After, target);

        Paragraph::new(left).render(pages[0], buf);
        Paragraph::new(right).render(pages[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn always(_: NaiveDate) -> bool {
        true
    }

    fn no_reason(_: NaiveDate) -> Option<String> {
        None
    }

    fn state_at(start: &str) -> DateRangePickerState {
        let mut state = DateRangePickerState::new().with_today(d(2022, 7, 10));
        state.set_values(start, "");
        state
    }

    #[test]
    fn selection_completes_in_click_order_independent_form() {
        let mut state = state_at("2022-07-20");
        state.handle_key(&key(KeyCode::Left), &always, &no_reason);
        state.handle_key(&key(KeyCode::Left), &always, &no_reason);
        assert_eq!(state.focused(), Some(d(2022, 7, 18)));

        let action = state.handle_key(&key(KeyCode::Enter), &always, &no_reason);
        let Some(DateRangePickerAction::Changed { start, end }) = action else {
            panic!("expected a completed range");
        };
        // Clicked backwards, reported ordered.
        assert_eq!(start.to_string(), "2022-07-18");
        assert_eq!(end.to_string(), "2022-07-20");
    }

    #[test]
    fn third_activation_restarts_the_selection() {
        let mut state = state_at("2022-07-05");
        state.set_values("2022-07-05", "2022-07-09");

        state.handle_key(&key(KeyCode::Right), &always, &no_reason);
        let action = state.handle_key(&key(KeyCode::Enter), &always, &no_reason);

        assert!(matches!(action, Some(DateRangePickerAction::SelectionStarted(_))));
        let (start, end) = state.bounds();
        assert!(start.is_some() && end.is_none());
    }

    #[test]
    fn lone_bound_borrows_focus_as_provisional_end() {
        let mut state = state_at("2022-07-10");
        state.handle_key(&key(KeyCode::Down), &always, &no_reason);

        let (a, b) = state.effective_bounds();
        assert_eq!(a, Some(d(2022, 7, 10)));
        assert_eq!(b, Some(d(2022, 7, 17)));
    }

    #[test]
    fn focus_within_right_page_is_not_a_page_change() {
        let mut state = state_at("2022-07-31");
        let action = state.handle_key(&key(KeyCode::Right), &always, &no_reason);

        // August is the visible right page, so crossing into it only
        // moves focus.
        assert_eq!(
            action,
            Some(DateRangePickerAction::FocusMoved { date: d(2022, 8, 1), page_changed: false })
        );
        assert_eq!(state.base(), d(2022, 7, 31));
    }

    #[test]
    fn focus_keeps_advancing_after_crossing_into_the_right_page() {
        // The start bound stays on the left page; it must not pull focus
        // resolution back once focus has crossed the seam.
        let mut state = state_at("2022-07-31");

        let action = state.handle_key(&key(KeyCode::Right), &always, &no_reason);
        assert_eq!(
            action,
            Some(DateRangePickerAction::FocusMoved { date: d(2022, 8, 1), page_changed: false })
        );

        let action = state.handle_key(&key(KeyCode::Right), &always, &no_reason);
        assert_eq!(
            action,
            Some(DateRangePickerAction::FocusMoved { date: d(2022, 8, 2), page_changed: false })
        );
        assert_eq!(state.focused(), Some(d(2022, 8, 2)));
    }

    #[test]
    fn focus_leaving_both_pages_shifts_them() {
        let mut state = state_at("2022-07-03");
        let action = state.handle_key(&key(KeyCode::Left), &always, &no_reason);

        assert_eq!(
            action,
            Some(DateRangePickerAction::FocusMoved { date: d(2022, 7, 2), page_changed: false })
        );

        // Walk back past July 1 into June: June is on neither page.
        state.handle_key(&key(KeyCode::Left), &always, &no_reason);
        let action = state.handle_key(&key(KeyCode::Left), &always, &no_reason);
        assert_eq!(
            action,
            Some(DateRangePickerAction::FocusMoved { date: d(2022, 6, 30), page_changed: true })
        );
        assert_eq!(state.base(), d(2022, 6, 30));
    }

    #[test]
    fn both_rendered_pages_have_six_week_rows() {
        let mut state = state_at("2022-07-10");
        let area = Rect::new(0, 0, 64, 10);
        let mut buf = Buffer::empty(area);

        DateRangePicker::new().render(area, &mut buf, &mut state);

        let row = |y: u16| -> String {
            (0..area.width).map(|x| buf[(x, y)].symbol()).collect()
        };
        assert!(row(0).contains("July 2022"));
        assert!(row(0).contains("August 2022"));
        // Six week rows follow the title and weekday header on each side.
        for y in 2..8 {
            assert!(row(y).trim().len() > 10, "row {y} should hold two week rows");
        }
    }
}
