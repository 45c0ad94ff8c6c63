//! Demo application orchestrator.
//!
//! One page per widget, cycled with Tab. The shell page drives the layout
//! bus through the host-facing entry points, so the demo doubles as a
//! walkthrough of the runtime drawer API.

use chrono::{Datelike, NaiveDate, Weekday};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::sync::Arc;
use tracing::info;

use crate::application::drawers::{
    self, AriaLabels, DrawerTrigger, FeatureNotifications, RuntimeDrawer,
};
use crate::application::layout_bus::{HandlerGuard, LayoutBus};
use crate::domain::date::Granularity;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{
    AppLayout, AppLayoutState, Calendar, CalendarAction, CalendarState, DateRangePicker,
    DateRangePickerAction, DateRangePickerState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    DayCalendar,
    MonthCalendar,
    RangePicker,
    Shell,
}

impl Page {
    const ALL: [Self; 4] = [
        Self::DayCalendar,
        Self::MonthCalendar,
        Self::RangePicker,
        Self::Shell,
    ];

    const fn title(self) -> &'static str {
        match self {
            Self::DayCalendar => "Calendar",
            Self::MonthCalendar => "Months",
            Self::RangePicker => "Range",
            Self::Shell => "Shell",
        }
    }

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Weekends are disabled; the 13th is disabled with an announced reason.
fn demo_enabled(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && date.day() != 13
}

fn demo_reason(date: NaiveDate) -> Option<String> {
    (date.day() == 13).then(|| "Fully booked".to_string())
}

fn all_enabled(_: NaiveDate) -> bool {
    true
}

fn no_reason(_: NaiveDate) -> Option<String> {
    None
}

/// The demo application.
pub struct DemoApp {
    page: Page,
    day_calendar: CalendarState,
    month_calendar: CalendarState,
    range_picker: DateRangePickerState,
    shell: AppLayoutState,
    bus: LayoutBus,
    _shell_guard: HandlerGuard,
    theme: Theme,
    status: String,
    should_quit: bool,
}

impl DemoApp {
    /// Creates the demo with its drawers registered on a fresh bus.
    #[must_use]
    pub fn new() -> Self {
        let bus = LayoutBus::new();

        // Register through the host entry points before the shell exists,
        // so attaching below exercises the buffered replay path.
        drawers::register_left_drawer(
            &bus,
            RuntimeDrawer::new("navigator")
                .with_aria_labels(AriaLabels {
                    drawer_name: Some("Navigator".into()),
                    trigger: Some("Open navigator".into()),
                    close: Some("Close navigator".into()),
                    resize_handle: Some("Resize navigator".into()),
                })
                .with_trigger(DrawerTrigger {
                    icon: "N".into(),
                    label: Some("Navigator".into()),
                })
                .with_resizable(true)
                .with_default_size(24)
                .with_content(Arc::new(|area, buf| {
                    Paragraph::new("Projects\n  almanac\n  scratchpad").render(area, buf);
                })),
        );
        drawers::register_bottom_drawer(
            &bus,
            RuntimeDrawer::new("console")
                .with_trigger(DrawerTrigger {
                    icon: "C".into(),
                    label: Some("Console".into()),
                })
                .with_default_size(8)
                .with_default_active(true)
                .with_content(Arc::new(|area, buf| {
                    Paragraph::new("ready.").render(area, buf);
                })),
        );
        drawers::register_feature_notifications(
            &bus,
            FeatureNotifications::new("whats-new").with_prompt("Press n for what's new"),
        );

        let mut shell = AppLayoutState::new();
        let shell_guard = shell.attach(&bus);

        Self {
            page: Page::DayCalendar,
            day_calendar: CalendarState::new(Granularity::Day),
            month_calendar: CalendarState::new(Granularity::Month),
            range_picker: DateRangePickerState::new(),
            shell,
            bus,
            _shell_guard: shell_guard,
            theme: Theme::default(),
            status: "Tab switches pages; q quits".into(),
            should_quit: false,
        }
    }

    /// Builds starting on the page whose title matches, case-insensitive.
    /// Unknown names keep the default page.
    #[must_use]
    pub fn with_page(mut self, name: &str) -> Self {
        if let Some(page) = Page::ALL.iter().find(|p| p.title().eq_ignore_ascii_case(name)) {
            self.page = *page;
        }
        self
    }

    /// Builds with a start-of-week day for every calendar page.
    #[must_use]
    pub fn with_start_of_week(mut self, start_of_week: Weekday) -> Self {
        self.day_calendar = self.day_calendar.clone().with_start_of_week(start_of_week);
        self.month_calendar = self.month_calendar.clone().with_start_of_week(start_of_week);
        self.range_picker = self.range_picker.clone().with_start_of_week(start_of_week);
        self
    }

    /// Runs the demo until the user quits.
    ///
    /// # Errors
    /// Returns an error when the terminal backend fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut events = EventStream::new();
        terminal.draw(|frame| self.render(frame))?;

        while !self.should_quit {
            let Some(event) = events.next().await else {
                break;
            };
            match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(&key),
                _ => {}
            }
            terminal.draw(|frame| self.render(frame))?;
        }
        info!("demo exiting");
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.page = self.page.next();
                return;
            }
            KeyCode::BackTab => {
                self.page = self.page.previous();
                return;
            }
            _ => {}
        }
        match self.page {
            Page::DayCalendar => self.handle_day_key(key),
            Page::MonthCalendar => self.handle_month_key(key),
            Page::RangePicker => self.handle_range_key(key),
            Page::Shell => self.handle_shell_key(key),
        }
    }

    fn handle_day_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('[') => self.day_calendar.previous_page(),
            KeyCode::Char(']') => self.day_calendar.next_page(),
            _ => {
                if let Some(action) = self.day_calendar.handle_key(key, &demo_enabled, &demo_reason)
                {
                    self.note_calendar_action(&action);
                }
            }
        }
    }

    fn handle_month_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('[') => self.month_calendar.previous_page(),
            KeyCode::Char(']') => self.month_calendar.next_page(),
            _ => {
                if let Some(action) =
                    self.month_calendar.handle_key(key, &all_enabled, &no_reason)
                {
                    self.note_calendar_action(&action);
                }
            }
        }
    }

    fn note_calendar_action(&mut self, action: &CalendarAction) {
        match action {
            CalendarAction::Changed(value) => {
                self.status = format!("Selected {value}");
            }
            CalendarAction::FocusMoved { date, page_changed } => {
                self.status = if *page_changed {
                    format!("Focus {date} (new page)")
                } else {
                    format!("Focus {date}")
                };
            }
        }
    }

    fn handle_range_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('[') => self.range_picker.previous_page(),
            KeyCode::Char(']') => self.range_picker.next_page(),
            _ => {
                let action = self.range_picker.handle_key(key, &all_enabled, &no_reason);
                match action {
                    Some(DateRangePickerAction::SelectionStarted(date)) => {
                        self.status = format!("Range starts {date}");
                    }
                    Some(DateRangePickerAction::Changed { start, end }) => {
                        self.status = format!("Range {start} to {end}");
                    }
                    Some(DateRangePickerAction::FocusMoved { date, .. }) => {
                        self.status = format!("Focus {date}");
                    }
                    None => {}
                }
            }
        }
    }

    fn handle_shell_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('o') => drawers::open_drawer(&self.bus, "navigator"),
            KeyCode::Char('c') => drawers::close_drawer(&self.bus, "navigator"),
            KeyCode::Char('+') => {
                let size = self.shell.drawer_size("navigator").unwrap_or_default() + 4;
                drawers::resize_drawer(&self.bus, "navigator", size);
            }
            KeyCode::Char('-') => {
                let size = self
                    .shell
                    .drawer_size("navigator")
                    .unwrap_or_default()
                    .saturating_sub(4);
                drawers::resize_drawer(&self.bus, "navigator", size);
            }
            KeyCode::Char('e') => drawers::expand_drawer(&self.bus, "console"),
            KeyCode::Char('x') => drawers::exit_expanded_mode(&self.bus),
            KeyCode::Char('n') => drawers::show_feature_prompt_if_possible(&self.bus),
            KeyCode::Char('d') => self.shell.dismiss_feature_prompt(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_tabs(frame, rows[0]);
        self.render_body(frame, rows[1]);
        frame.render_widget(Line::from(self.status.as_str()), rows[2]);
    }

    fn render_tabs(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = crate::presentation::theme::AppLayoutStyle::from_theme(&self.theme);
        let spans: Vec<Span<'_>> = Page::ALL
            .iter()
            .flat_map(|page| {
                let label_style = if *page == self.page {
                    style.active_trigger
                } else {
                    style.trigger_bar
                };
                [Span::styled(page.title(), label_style), Span::raw("  ")]
            })
            .collect();
        frame.render_widget(Line::from(spans), area);
    }

    fn render_body(&mut self, frame: &mut Frame<'_>, area: Rect) {
        match self.page {
            Page::DayCalendar => {
                let calendar = Calendar::new()
                    .with_enabled(&demo_enabled)
                    .with_disabled_reason(&demo_reason);
                frame.render_stateful_widget(calendar, area, &mut self.day_calendar);
            }
            Page::MonthCalendar => {
                frame.render_stateful_widget(Calendar::new(), area, &mut self.month_calendar);
            }
            Page::RangePicker => {
                frame.render_stateful_widget(DateRangePicker::new(), area, &mut self.range_picker);
            }
            Page::Shell => {
                frame.render_stateful_widget(AppLayout::new(), area, &mut self.shell);
            }
        }
    }
}

impl Default for DemoApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(
            code,
            crossterm::event::KeyModifiers::NONE,
            KeyEventKind::Press,
        )
    }

    #[test]
    fn tab_cycles_through_all_pages_and_back() {
        let mut app = DemoApp::new();
        let start = app.page;
        for _ in 0..Page::ALL.len() {
            app.handle_key(&key(KeyCode::Tab));
        }
        assert_eq!(app.page, start);
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut app = DemoApp::new();
        app.handle_key(&key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn shell_page_keys_drive_the_bus() {
        let mut app = DemoApp::new();
        app.page = Page::Shell;

        app.handle_key(&key(KeyCode::Char('o')));
        app.shell.process_messages();
        assert_eq!(app.shell.active_left(), Some("navigator"));

        app.handle_key(&key(KeyCode::Char('c')));
        app.shell.process_messages();
        assert_eq!(app.shell.active_left(), None);
    }
}
