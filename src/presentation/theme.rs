//! Widget themes.
//!
//! A small palette plus per-widget style bundles derived from it. Widgets
//! take a style bundle, not the palette, so hosts can restyle individual
//! states without a theme.

use ratatui::style::{Color, Modifier, Style};

/// Base palette shared by all widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Accent color for selection and focus.
    pub accent: Color,
    /// De-emphasized foreground.
    pub muted: Color,
    /// Range fill background.
    pub range_fill: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            range_fill: Color::Rgb(20, 45, 60),
        }
    }
}

/// Styles for calendar grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarStyle {
    /// Page title (month and year, or year).
    pub header: Style,
    /// Weekday column headers.
    pub weekday: Style,
    /// Regular enabled cell.
    pub day: Style,
    /// Cell belonging to an adjacent page.
    pub adjacent: Style,
    /// Today marker.
    pub today: Style,
    /// Selected cell.
    pub selected: Style,
    /// Focus target.
    pub focused: Style,
    /// Disabled cell without a reason.
    pub disabled: Style,
    /// Disabled cell that carries a reason.
    pub disabled_with_reason: Style,
    /// Cell inside a selected range.
    pub in_range: Style,
    /// In-range cell on a range edge.
    pub range_edge: Style,
    /// Footer line announcing a disabled reason.
    pub reason_footer: Style,
}

impl CalendarStyle {
    /// Derives the bundle from a palette.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            weekday: Style::default().fg(theme.muted),
            day: Style::default(),
            adjacent: Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
            today: Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
            selected: Style::default()
                .bg(theme.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            focused: Style::default().add_modifier(Modifier::REVERSED),
            disabled: Style::default().fg(theme.muted).add_modifier(Modifier::CROSSED_OUT),
            disabled_with_reason: Style::default().fg(theme.muted),
            in_range: Style::default().bg(theme.range_fill),
            range_edge: Style::default().bg(theme.range_fill).add_modifier(Modifier::BOLD),
            reason_footer: Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        }
    }
}

impl Default for CalendarStyle {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

/// Styles for the app-layout shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayoutStyle {
    /// Trigger-bar background.
    pub trigger_bar: Style,
    /// Trigger for the active drawer.
    pub active_trigger: Style,
    /// Drawer title line.
    pub drawer_title: Style,
    /// Drawer border.
    pub drawer_border: Style,
    /// Feature prompt popup.
    pub feature_prompt: Style,
}

impl AppLayoutStyle {
    /// Derives the bundle from a palette.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            trigger_bar: Style::default().fg(theme.muted),
            active_trigger: Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            drawer_title: Style::default().add_modifier(Modifier::BOLD),
            drawer_border: Style::default().fg(theme.muted),
            feature_prompt: Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        }
    }
}

impl Default for AppLayoutStyle {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}
