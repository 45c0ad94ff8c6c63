//! Calendar widget for single-date selection.
//!
//! One widget covers both granularities: a month page of days, or a year
//! page of months laid out 4×3. Keyboard handling goes through the domain
//! navigation reducer; the widget owns the `(base, focused, selected)`
//! state and the accessible rendering.

use chrono::{Datelike, NaiveDate, Weekday};
use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::date::{DateValue, Granularity, TextDirection, add_months};
use crate::domain::focus::{DisabledReasonFn, focusable_date};
use crate::domain::grid::{in_page, month_weeks, year_months};
use crate::domain::movement::EnabledPredicate;
use crate::domain::navigation::{NavOutcome, reduce};
use crate::presentation::theme::CalendarStyle;

/// Actions produced by calendar key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    /// A date was committed; carries the public value.
    Changed(DateValue),
    /// Focus moved; the base date was already updated when `page_changed`
    /// is set.
    FocusMoved {
        /// The new focus target.
        date: NaiveDate,
        /// Whether the displayed page changed.
        page_changed: bool,
    },
}

/// State for the calendar widget.
#[derive(Debug, Clone)]
pub struct CalendarState {
    base: NaiveDate,
    focused: Option<NaiveDate>,
    selected: Option<NaiveDate>,
    granularity: Granularity,
    start_of_week: Weekday,
    direction: TextDirection,
    today: NaiveDate,
}

impl CalendarState {
    /// Creates a state paged to today with no selection.
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            base: today,
            focused: None,
            selected: None,
            granularity,
            start_of_week: Weekday::Sun,
            direction: TextDirection::LeftToRight,
            today,
        }
    }

    /// Creates a state from a raw value string.
    ///
    /// An unparseable value means no selection, and the page falls back
    /// to today.
    #[must_use]
    pub fn from_value(raw: &str, granularity: Granularity) -> Self {
        let mut state = Self::new(granularity);
        state.set_value(raw);
        state
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

    /// Replaces the selection from a raw value string, with the same
    /// fallback as [`CalendarState::from_value`].
    pub fn set_value(&mut self, raw: &str) {
        match DateValue::parse(raw, self.granularity) {
            Ok(value) => {
                self.selected = Some(value.date());
                self.base = value.date();
            }
            Err(_) => {
                self.selected = None;
                self.base = self.today;
            }
        }
    }

    /// The current public value, if a date is selected.
    #[must_use]
    pub fn value(&self) -> Option<DateValue> {
        self.selected
            .map(|date| DateValue::from_date(date, self.granularity))
    }

    /// The anchor date of the displayed page.
    #[must_use]
    pub const fn base(&self) -> NaiveDate {
        self.base
    }

    /// The explicit focus target, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<NaiveDate> {
        self.focused
    }

    /// The selected date, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// The grid granularity.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Pages forward one month (or one year at month granularity).
    pub fn next_page(&mut self) {
        self.base = add_months(self.base, self.page_step());
    }

    /// Pages backward one month (or one year at month granularity).
    pub fn previous_page(&mut self) {
        self.base = add_months(self.base, -self.page_step());
    }

    const fn page_step(&self) -> i32 {
        match self.granularity {
            Granularity::Day => 1,
            Granularity::Month => 12,
        }
    }

    /// The single focus target for the displayed page.
    #[must_use]
    pub fn focus_target(
        &self,
        is_enabled: EnabledPredicate<'_>,
        disabled_reason: DisabledReasonFn<'_>,
    ) -> Option<NaiveDate> {
        focusable_date(
            self.focused,
            self.selected,
            self.today,
            self.base,
            self.granularity,
            is_enabled,
            disabled_reason,
        )
    }

    /// Reduces one key event against the grid.
    ///
    /// On a page-crossing move the base date is updated before the focus
    /// target, so observers always see a consistent page.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        is_enabled: EnabledPredicate<'_>,
        disabled_reason: DisabledReasonFn<'_>,
    ) -> Option<CalendarAction> {
        let target = self.focus_target(is_enabled, disabled_reason);
        match reduce(
            key,
            self.granularity,
            self.direction,
            self.base,
            target,
            is_enabled,
            disabled_reason,
        ) {
            NavOutcome::Ignored => None,
            NavOutcome::Selected(date) => {
                self.focused = None;
                self.selected = Some(date);
                Some(CalendarAction::Changed(DateValue::from_date(
                    date,
                    self.granularity,
                )))
            }
            NavOutcome::Focused { date, page_changed } => {
                if page_changed {
                    self.base = date;
                }
                self.focused = Some(date);
                Some(CalendarAction::FocusMoved { date, page_changed })
            }
        }
    }
}

/// Short weekday header label.
pub(crate) const fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Calendar widget.
pub struct Calendar<'a> {
    is_enabled: EnabledPredicate<'a>,
    disabled_reason: DisabledReasonFn<'a>,
    style: CalendarStyle,
}

impl<'a> Calendar<'a> {
    /// Creates a calendar with every date enabled.
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

    fn cell_style(&self, state: &CalendarState, date: NaiveDate, target: Option<NaiveDate>) -> ratatui::style::Style {
        let on_page = in_page(date, state.base, state.granularity);
        let enabled = (self.is_enabled)(date);

        let mut style = if state.selected == Some(date) {
            self.style.selected
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
        style
    }

    fn day_lines(&self, state: &CalendarState, target: Option<NaiveDate>) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        lines.push(Line::styled(
            state.base.format("%B %Y").to_string(),
            self.style.header,
        ));

        let mut header = Vec::new();
        let mut weekday = state.start_of_week;
        for _ in 0..7 {
            header.push(Span::styled(format!("{:>3} ", weekday_label(weekday)), self.style.weekday));
            weekday = weekday.succ();
        }
        lines.push(Line::from(header));

        for week in month_weeks(state.base, state.start_of_week) {
            let spans = week
                .iter()
                .map(|&date| {
                    Span::styled(
                        format!("{:>3} ", date.day()),
                        self.cell_style(state, date, target),
                    )
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(spans));
        }
        lines
    }

    fn month_lines(&self, state: &CalendarState, target: Option<NaiveDate>) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        lines.push(Line::styled(
            state.base.format("%Y").to_string(),
            self.style.header,
        ));
        for row in year_months(state.base) {
            let spans = row
                .iter()
                .map(|&month| {
                    Span::styled(
                        format!(" {} ", month.format("%b")),
                        self.cell_style(state, month, target),
                    )
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Default for Calendar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWidget for Calendar<'_> {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let target = state.focus_target(self.is_enabled, self.disabled_reason);

        let mut lines = match state.granularity {
            Granularity::Day => self.day_lines(state, target),
            Granularity::Month => self.month_lines(state, target),
        };

        // Announce the disabled reason of a focused-but-disabled cell.
        if let Some(date) = target {
            if !(self.is_enabled)(date) {
                if let Some(reason) = (self.disabled_reason)(date) {
                    lines.push(Line::styled(reason, self.style.reason_footer));
                }
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn no_reason(_: NaiveDate) -> Option<String> {
        None
    }

    fn always(_: NaiveDate) -> bool {
        true
    }

    fn july_2022_state() -> CalendarState {
        CalendarState::from_value("2022-07-31", Granularity::Day).with_today(d(2022, 7, 10))
    }

    #[test]
    fn arrow_right_across_month_boundary_changes_page_then_focus() {
        let mut state = july_2022_state();
        assert!(crate::domain::date::same_month(state.base(), d(2022, 7, 1)));

        let action = state.handle_key(&key(KeyCode::Right), &always, &no_reason);

        assert_eq!(
            action,
            Some(CalendarAction::FocusMoved { date: d(2022, 8, 1), page_changed: true })
        );
        assert!(crate::domain::date::same_month(state.base(), d(2022, 8, 1)));
        assert_eq!(state.focused(), Some(d(2022, 8, 1)));
    }

    #[test]
    fn arrow_right_skips_disabled_dates() {
        let mut state = CalendarState::from_value("2022-07-15", Granularity::Day)
            .with_today(d(2022, 7, 10));
        let enabled = |date: NaiveDate| !(date.day() == 16 || date.day() == 17);

        let action = state.handle_key(&key(KeyCode::Right), &enabled, &no_reason);

        assert_eq!(
            action,
            Some(CalendarAction::FocusMoved { date: d(2022, 7, 18), page_changed: false })
        );
    }

    #[test]
    fn activation_commits_the_focus_target_and_clears_focus() {
        let mut state = july_2022_state();
        state.handle_key(&key(KeyCode::Left), &always, &no_reason);
        assert_eq!(state.focused(), Some(d(2022, 7, 30)));

        let action = state.handle_key(&key(KeyCode::Enter), &always, &no_reason);

        let Some(CalendarAction::Changed(value)) = action else {
            panic!("expected a change action");
        };
        assert_eq!(value.to_string(), "2022-07-30");
        assert_eq!(state.selected(), Some(d(2022, 7, 30)));
        assert_eq!(state.focused(), None);
    }

    #[test]
    fn invalid_value_means_no_selection_and_today_page() {
        let state = CalendarState::new(Granularity::Day)
            .with_today(d(2022, 7, 10));
        let mut state = state;
        state.set_value("31-07-2022");

        assert_eq!(state.value(), None);
        assert_eq!(state.base(), d(2022, 7, 10));
    }

    #[test]
    fn month_granularity_emits_month_values() {
        let mut state = CalendarState::from_value("2022-07", Granularity::Month)
            .with_today(d(2022, 7, 10));

        let action = state.handle_key(&key(KeyCode::Enter), &always, &no_reason);

        let Some(CalendarAction::Changed(value)) = action else {
            panic!("expected a change action");
        };
        assert_eq!(value.to_string(), "2022-07");
    }

    #[test]
    fn paging_moves_one_page_per_granularity() {
        let mut day = july_2022_state();
        day.next_page();
        assert!(crate::domain::date::same_month(day.base(), d(2022, 8, 1)));
        day.previous_page();
        assert!(crate::domain::date::same_month(day.base(), d(2022, 7, 1)));

        let mut month = CalendarState::from_value("2022-07", Granularity::Month)
            .with_today(d(2022, 7, 10));
        month.next_page();
        assert_eq!(month.base().year(), 2023);
    }

    #[test]
    fn render_shows_page_title_and_weekday_headers() {
        let mut state = july_2022_state();
        let area = Rect::new(0, 0, 32, 10);
        let mut buf = Buffer::empty(area);

        Calendar::new().render(area, &mut buf, &mut state);

        let row = |y: u16| -> String {
            (0..area.width).map(|x| buf[(x, y)].symbol()).collect()
        };
        assert!(row(0).starts_with("July 2022"));
        assert!(row(1).contains("Su") && row(1).contains("Sa"));
        assert!(row(2).contains("26")); // June 26 opens the first week
    }

    #[test]
    fn render_announces_disabled_reason_of_focused_cell() {
        let mut state = CalendarState::new(Granularity::Day).with_today(d(2022, 7, 10));
        state.set_value("2022-07-20");
        state.handle_key(
            &key(KeyCode::Right),
            &|date| date.day() != 21,
            &|date| (date.day() == 21).then(|| "maintenance window".to_string()),
        );

        let area = Rect::new(0, 0, 32, 12);
        let mut buf = Buffer::empty(area);
        Calendar::new()
            .with_enabled(&|date| date.day() != 21)
            .with_disabled_reason(&|date| {
                (date.day() == 21).then(|| "maintenance window".to_string())
            })
            .render(area, &mut buf, &mut state);

        let text: String = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("maintenance window"));
    }
}
