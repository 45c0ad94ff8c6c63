//! Stateful widgets: calendars, the range picker, and the app-layout
//! shell.

/// App-layout shell with runtime drawers.
pub mod app_layout;
/// Single-date calendar for day and month granularity.
pub mod calendar;
/// Two-page date-range picker.
pub mod date_range_picker;

pub use app_layout::{AppLayout, AppLayoutState, MAX_DRAWER_SIZE, MIN_DRAWER_SIZE};
pub use calendar::{Calendar, CalendarAction, CalendarState};
pub use date_range_picker::{DateRangePicker, DateRangePickerAction, DateRangePickerState};
