//! Presentation layer: themes, widgets, and the demo UI.

/// Widget themes and style bundles.
pub mod theme;
/// Demo application shell.
pub mod ui;
/// Stateful widgets.
pub mod widgets;

pub use theme::{AppLayoutStyle, CalendarStyle, Theme};
pub use ui::DemoApp;
pub use widgets::{
    AppLayout, AppLayoutState, Calendar, CalendarAction, CalendarState, DateRangePicker,
    DateRangePickerAction, DateRangePickerState,
};
