//! App-layout shell widget.
//!
//! The consumer of the layout bus. The shell owns the runtime drawer
//! state: which drawers exist, which are open, their sizes, the expanded
//! drawer, and the feature-notifications panel. Messages arrive through an
//! inbox filled by the bus handler and are applied on the render thread by
//! [`AppLayoutState::process_messages`], so callbacks and state mutation
//! never run on a registrant's thread.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use tracing::{debug, warn};

use crate::application::drawers::{FeatureNotifications, RuntimeDrawer};
use crate::application::layout_bus::{HandlerGuard, LayoutBus, LayoutMessage, LayoutHandler};
use crate::presentation::theme::AppLayoutStyle;

/// Smallest size a resize may produce.
pub const MIN_DRAWER_SIZE: u16 = 10;
/// Largest size a resize may produce.
pub const MAX_DRAWER_SIZE: u16 = 80;

const TRIGGER_BAR_WIDTH: u16 = 4;
const TRIGGER_BAR_HEIGHT: u16 = 1;

/// Edge a drawer is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Bottom,
}

type Inbox = Arc<Mutex<VecDeque<LayoutMessage>>>;

/// Bus handler that forwards every message into the shell's inbox.
struct InboxHandler {
    inbox: Inbox,
}

impl LayoutHandler for InboxHandler {
    fn handle(&mut self, message: &LayoutMessage) {
        self.inbox.lock().push_back(message.clone());
    }
}

/// One docked drawer plus its runtime size.
#[derive(Clone)]
struct DockedDrawer {
    config: RuntimeDrawer,
    size: u16,
}

/// State for the app-layout shell.
#[derive(Default)]
pub struct AppLayoutState {
    left: Vec<DockedDrawer>,
    bottom: Vec<DockedDrawer>,
    active_left: Option<String>,
    active_bottom: Option<String>,
    expanded: Option<String>,
    feature_notifications: Option<FeatureNotifications>,
    show_feature_prompt: bool,
    content_area: Rect,
    inbox: Inbox,
}

impl AppLayoutState {
    /// Creates an empty shell state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs this shell as the bus handler and applies the buffered
    /// messages in push order.
    ///
    /// Registrations already consumed live may replay from the buffer;
    /// every message application is idempotent by id, so the replay is a
    /// refresh rather than a duplication.
    pub fn attach(&mut self, bus: &LayoutBus) -> HandlerGuard {
        let handler = InboxHandler {
            inbox: Arc::clone(&self.inbox),
        };
        let (_, guard) = bus.register_handler(Box::new(handler));
        for message in bus.initial_messages() {
            self.apply(&message);
        }
        guard
    }

    /// Drains the inbox, applying each message in arrival order.
    pub fn process_messages(&mut self) {
        loop {
            let Some(message) = self.inbox.lock().pop_front() else {
                return;
            };
            self.apply(&message);
        }
    }

    /// The area left for host content after the last render.
    #[must_use]
    pub const fn content_area(&self) -> Rect {
        self.content_area
    }

    /// Ids of the drawers docked to the left edge, in registration order.
    #[must_use]
    pub fn left_drawer_ids(&self) -> Vec<&str> {
        self.left.iter().map(|d| d.config.id.as_str()).collect()
    }

    /// Ids of the drawers docked to the bottom edge.
    #[must_use]
    pub fn bottom_drawer_ids(&self) -> Vec<&str> {
        self.bottom.iter().map(|d| d.config.id.as_str()).collect()
    }

    /// The open left drawer's id, if any.
    #[must_use]
    pub fn active_left(&self) -> Option<&str> {
        self.active_left.as_deref()
    }

    /// The open bottom drawer's id, if any.
    #[must_use]
    pub fn active_bottom(&self) -> Option<&str> {
        self.active_bottom.as_deref()
    }

    /// The expanded drawer's id, if any.
    #[must_use]
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Whether the feature prompt is showing.
    #[must_use]
    pub const fn feature_prompt_visible(&self) -> bool {
        self.show_feature_prompt
    }

    /// Current size of a drawer, on either edge.
    #[must_use]
    pub fn drawer_size(&self, id: &str) -> Option<u16> {
        self.find(id).map(|(drawer, _)| drawer.size)
    }

    fn find(&self, id: &str) -> Option<(&DockedDrawer, Edge)> {
        self.left
            .iter()
            .find(|d| d.config.id == id)
            .map(|d| (d, Edge::Left))
            .or_else(|| {
                self.bottom
                    .iter()
                    .find(|d| d.config.id == id)
                    .map(|d| (d, Edge::Bottom))
            })
    }

    fn register(&mut self, drawer: &RuntimeDrawer, edge: Edge) {
        let dock = match edge {
            Edge::Left => &mut self.left,
            Edge::Bottom => &mut self.bottom,
        };
        if let Some(existing) = dock.iter_mut().find(|d| d.config.id == drawer.id) {
            // Re-registration refreshes the config but keeps the runtime
            // size the user may have dragged to.
            existing.config = drawer.clone();
        } else {
            dock.push(DockedDrawer {
                config: drawer.clone(),
                size: drawer.default_size,
            });
        }
        if drawer.default_active {
            match edge {
                Edge::Left => self.active_left = Some(drawer.id.clone()),
                Edge::Bottom => self.active_bottom = Some(drawer.id.clone()),
            }
        }
    }

    fn set_open(&mut self, id: &str, open: bool) {
        let Some((drawer, edge)) = self.find(id) else {
            warn!(id, "open/close for unknown drawer");
            return;
        };
        let on_toggle = drawer.config.on_toggle.clone();
        let active = match edge {
            Edge::Left => &mut self.active_left,
            Edge::Bottom => &mut self.active_bottom,
        };
        let was_open = active.as_deref() == Some(id);
        if open == was_open {
            return;
        }
        *active = open.then(|| id.to_string());
        if !open && self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        }
        if let Some(on_toggle) = on_toggle {
            on_toggle(open);
        }
    }

    fn resize(&mut self, id: &str, size: u16) {
        let dock = if self.left.iter().any(|d| d.config.id == id) {
            &mut self.left
        } else {
            &mut self.bottom
        };
        let Some(drawer) = dock.iter_mut().find(|d| d.config.id == id) else {
            warn!(id, "resize for unknown drawer");
            return;
        };
        if !drawer.config.resizable {
            debug!(id, "resize ignored for fixed-size drawer");
            return;
        }
        let clamped = size.clamp(MIN_DRAWER_SIZE, MAX_DRAWER_SIZE);
        drawer.size = clamped;
        if let Some(on_resize) = drawer.config.on_resize.clone() {
            on_resize(clamped);
        }
    }

    fn apply(&mut self, message: &LayoutMessage) {
        debug!(kind = message.kind(), "applying layout message");
        match message {
            LayoutMessage::RegisterLeftDrawer(drawer) => self.register(drawer, Edge::Left),
            LayoutMessage::RegisterBottomDrawer(drawer) => self.register(drawer, Edge::Bottom),
            LayoutMessage::RegisterFeatureNotifications(config) => {
                self.feature_notifications = Some(config.clone());
            }
            LayoutMessage::UpdateDrawerConfig(update) => {
                let target = self
                    .left
                    .iter_mut()
                    .chain(self.bottom.iter_mut())
                    .find(|d| d.config.id == update.id);
                match target {
                    Some(drawer) => update.apply_to(&mut drawer.config),
                    None => warn!(id = %update.id, "config update for unknown drawer"),
                }
            }
            LayoutMessage::OpenDrawer { id } => self.set_open(id, true),
            LayoutMessage::CloseDrawer { id } => self.set_open(id, false),
            LayoutMessage::ResizeDrawer { id, size } => self.resize(id, *size),
            LayoutMessage::ExpandDrawer { id } => {
                if self.find(id).is_some() {
                    self.expanded = Some(id.clone());
                } else {
                    warn!(id, "expand for unknown drawer");
                }
            }
            LayoutMessage::ExitExpandedMode => self.expanded = None,
            LayoutMessage::ShowFeaturePromptIfPossible => {
                // Only meaningful once a notifications panel exists.
                self.show_feature_prompt = self.feature_notifications.is_some();
                if !self.show_feature_prompt {
                    debug!("feature prompt requested without a registered panel");
                }
            }
        }
    }

    /// Hides the feature prompt, typically after the user dismissed it.
    pub fn dismiss_feature_prompt(&mut self) {
        self.show_feature_prompt = false;
    }
}

impl std::fmt::Debug for AppLayoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLayoutState")
            .field("left", &self.left_drawer_ids())
            .field("bottom", &self.bottom_drawer_ids())
            .field("active_left", &self.active_left)
            .field("active_bottom", &self.active_bottom)
            .field("expanded", &self.expanded)
            .field("show_feature_prompt", &self.show_feature_prompt)
            .finish_non_exhaustive()
    }
}

/// App-layout shell widget: trigger bars, docked drawers, expanded mode,
/// and the feature prompt.
#[derive(Default)]
pub struct AppLayout {
    style: AppLayoutStyle,
}

impl AppLayout {
    /// Creates a shell with the default style bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds with a style bundle.
    #[must_use]
    pub fn with_style(mut self, style: AppLayoutStyle) -> Self {
        self.style = style;
        self
    }

    fn trigger_line(&self, drawer: &DockedDrawer, active: bool) -> Span<'static> {
        let icon = if drawer.config.trigger.icon.is_empty() {
            drawer
                .config
                .id
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase().to_string())
                .unwrap_or_default()
        } else {
            drawer.config.trigger.icon.clone()
        };
        let style = if active {
            self.style.active_trigger
        } else {
            self.style.trigger_bar
        };
        Span::styled(icon, style)
    }

    fn drawer_title(drawer: &DockedDrawer) -> String {
        drawer
            .config
            .aria_labels
            .drawer_name
            .clone()
            .unwrap_or_else(|| drawer.config.id.clone())
    }

    fn render_drawer(&self, drawer: &DockedDrawer, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Span::styled(Self::drawer_title(drawer), self.style.drawer_title))
            .border_style(self.style.drawer_border);
        let inner = block.inner(area);
        block.render(area, buf);
        if let Some(content) = &drawer.config.content {
            content(inner, buf);
        }
    }
}

impl StatefulWidget for AppLayout {
    type State = AppLayoutState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.process_messages();

        let mut body = area;

        // Bottom trigger bar, then the open bottom drawer above it.
        if !state.bottom.is_empty() && body.height > TRIGGER_BAR_HEIGHT {
            let bar = Rect::new(
                body.x,
                body.y + body.height - TRIGGER_BAR_HEIGHT,
                body.width,
                TRIGGER_BAR_HEIGHT,
            );
            body.height -= TRIGGER_BAR_HEIGHT;

            let spans: Vec<Span<'static>> = state
                .bottom
                .iter()
                .flat_map(|drawer| {
                    let active = state.active_bottom.as_deref() == Some(drawer.config.id.as_str());
                    [self.trigger_line(drawer, active), Span::raw(" ")]
                })
                .collect();
            Paragraph::new(Line::from(spans))
                .style(self.style.trigger_bar)
                .render(bar, buf);

            if let Some(drawer) = state
                .active_bottom
                .as_deref()
                .and_then(|id| state.bottom.iter().find(|d| d.config.id == id))
                .cloned()
            {
                let height = drawer.size.min(body.height);
                let panel = Rect::new(body.x, body.y + body.height - height, body.width, height);
                body.height -= height;
                self.render_drawer(&drawer, panel, buf);
            }
        }

        // Left trigger bar, then the open left drawer next to it.
        if !state.left.is_empty() && body.width > TRIGGER_BAR_WIDTH {
            let bar = Rect::new(body.x, body.y, TRIGGER_BAR_WIDTH, body.height);
            body.x += TRIGGER_BAR_WIDTH;
            body.width -= TRIGGER_BAR_WIDTH;

            let lines: Vec<Line<'static>> = state
                .left
                .iter()
                .map(|drawer| {
                    let active = state.active_left.as_deref() == Some(drawer.config.id.as_str());
                    Line::from(self.trigger_line(drawer, active))
                })
                .collect();
            Paragraph::new(lines)
                .style(self.style.trigger_bar)
                .render(bar, buf);

            if let Some(drawer) = state
                .active_left
                .as_deref()
                .and_then(|id| state.left.iter().find(|d| d.config.id == id))
                .cloned()
            {
                let width = drawer.size.min(body.width);
                let panel = Rect::new(body.x, body.y, width, body.height);
                body.x += width;
                body.width -= width;
                self.render_drawer(&drawer, panel, buf);
            }
        }

        state.content_area = body;

        // Expanded mode paints the drawer over the whole content area.
        if let Some(drawer) = state
            .expanded
            .as_deref()
            .and_then(|id| state.find(id))
            .map(|(drawer, _)| drawer.clone())
        {
            Clear.render(body, buf);
            self.render_drawer(&drawer, body, buf);
        }

        if state.show_feature_prompt {
            let prompt = state
                .feature_notifications
                .as_ref()
                .and_then(|f| f.prompt.clone())
                .unwrap_or_else(|| "What's new".to_string());
            let width = (prompt.len() as u16 + 2).min(body.width);
            if width > 0 && body.height > 0 {
                let popup = Rect::new(
                    body.x + body.width - width,
                    body.y + body.height - 1,
                    width,
                    1,
                );
                Clear.render(popup, buf);
                Paragraph::new(Span::styled(format!(" {prompt} "), self.style.feature_prompt))
                    .render(popup, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

    use crate::application::drawers::{
        self, DrawerTrigger, DrawerUpdate, register_bottom_drawer, register_left_drawer,
    };

    fn drawer(id: &str) -> RuntimeDrawer {
        RuntimeDrawer::new(id).with_trigger(DrawerTrigger {
            icon: id.chars().next().unwrap().to_string().to_uppercase(),
            label: None,
        })
    }

    #[test]
    fn attach_replays_buffered_registrations_in_push_order() {
        let bus = LayoutBus::new();
        register_left_drawer(&bus, drawer("tools"));
        register_bottom_drawer(&bus, drawer("console"));
        drawers::open_drawer(&bus, "tools");

        let mut state = AppLayoutState::new();
        let _guard = state.attach(&bus);

        assert_eq!(state.left_drawer_ids(), ["tools"]);
        assert_eq!(state.bottom_drawer_ids(), ["console"]);
        assert_eq!(state.active_left(), Some("tools"));
    }

    #[test]
    fn re_registration_refreshes_config_but_keeps_runtime_size() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(
            drawer("tools").with_resizable(true).with_default_size(20),
        ));
        state.apply(&LayoutMessage::ResizeDrawer { id: "tools".into(), size: 44 });
        assert_eq!(state.drawer_size("tools"), Some(44));

        state.apply(&LayoutMessage::RegisterLeftDrawer(
            drawer("tools").with_resizable(true).with_default_size(20),
        ));
        assert_eq!(state.left_drawer_ids(), ["tools"]);
        assert_eq!(state.drawer_size("tools"), Some(44));
    }

    #[test]
    fn default_active_drawer_opens_on_registration() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterBottomDrawer(
            drawer("console").with_default_active(true),
        ));
        assert_eq!(state.active_bottom(), Some("console"));
    }

    #[test]
    fn open_and_close_fire_the_toggle_callback() {
        static OPEN: AtomicBool = AtomicBool::new(false);
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(
            drawer("tools").with_on_toggle(Arc::new(|open| OPEN.store(open, Ordering::SeqCst))),
        ));

        state.apply(&LayoutMessage::OpenDrawer { id: "tools".into() });
        assert!(OPEN.load(Ordering::SeqCst));
        assert_eq!(state.active_left(), Some("tools"));

        // Opening an already-open drawer does not re-fire.
        OPEN.store(false, Ordering::SeqCst);
        state.apply(&LayoutMessage::OpenDrawer { id: "tools".into() });
        assert!(!OPEN.load(Ordering::SeqCst));

        state.apply(&LayoutMessage::CloseDrawer { id: "tools".into() });
        assert_eq!(state.active_left(), None);
    }

    #[test]
    fn resize_clamps_and_reports_the_clamped_size() {
        static SIZE: AtomicU16 = AtomicU16::new(0);
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(
            drawer("tools")
                .with_resizable(true)
                .with_on_resize(Arc::new(|size| SIZE.store(size, Ordering::SeqCst))),
        ));

        state.apply(&LayoutMessage::ResizeDrawer { id: "tools".into(), size: 500 });
        assert_eq!(state.drawer_size("tools"), Some(MAX_DRAWER_SIZE));
        assert_eq!(SIZE.load(Ordering::SeqCst), MAX_DRAWER_SIZE);

        state.apply(&LayoutMessage::ResizeDrawer { id: "tools".into(), size: 1 });
        assert_eq!(state.drawer_size("tools"), Some(MIN_DRAWER_SIZE));
    }

    #[test]
    fn resize_is_ignored_for_fixed_size_drawers() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(drawer("tools").with_default_size(25)));

        state.apply(&LayoutMessage::ResizeDrawer { id: "tools".into(), size: 60 });
        assert_eq!(state.drawer_size("tools"), Some(25));
    }

    #[test]
    fn config_update_with_unknown_id_changes_nothing() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(drawer("tools").with_default_size(25)));

        state.apply(&LayoutMessage::UpdateDrawerConfig(
            DrawerUpdate::new("other").with_default_size(60),
        ));
        assert_eq!(state.drawer_size("tools"), Some(25));
    }

    #[test]
    fn feature_prompt_needs_a_registered_panel() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::ShowFeaturePromptIfPossible);
        assert!(!state.feature_prompt_visible());

        state.apply(&LayoutMessage::RegisterFeatureNotifications(
            FeatureNotifications::new("whats-new").with_prompt("See what's new"),
        ));
        state.apply(&LayoutMessage::ShowFeaturePromptIfPossible);
        assert!(state.feature_prompt_visible());
    }

    #[test]
    fn closing_an_expanded_drawer_leaves_expanded_mode() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(drawer("tools")));
        state.apply(&LayoutMessage::OpenDrawer { id: "tools".into() });
        state.apply(&LayoutMessage::ExpandDrawer { id: "tools".into() });
        assert_eq!(state.expanded(), Some("tools"));

        state.apply(&LayoutMessage::CloseDrawer { id: "tools".into() });
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn live_dispatch_lands_in_the_inbox_until_processed() {
        let bus = LayoutBus::new();
        let mut state = AppLayoutState::new();
        let _guard = state.attach(&bus);

        drawers::register_left_drawer(&bus, drawer("tools"));
        drawers::open_drawer(&bus, "tools");
        assert!(state.left_drawer_ids().is_empty());

        state.process_messages();
        assert_eq!(state.left_drawer_ids(), ["tools"]);
        assert_eq!(state.active_left(), Some("tools"));
    }

    #[test]
    fn render_reserves_bars_and_panels_from_the_content_area() {
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(
            drawer("tools").with_default_size(20).with_default_active(true),
        ));
        state.apply(&LayoutMessage::RegisterBottomDrawer(drawer("console")));

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        AppLayout::new().render(area, &mut buf, &mut state);

        let content = state.content_area();
        // Trigger bar + open 20-cell drawer on the left, bar row at the
        // bottom.
        assert_eq!(content.x, TRIGGER_BAR_WIDTH + 20);
        assert_eq!(content.width, 80 - TRIGGER_BAR_WIDTH - 20);
        assert_eq!(content.height, 24 - TRIGGER_BAR_HEIGHT);
        assert_eq!(buf[(0, 0)].symbol(), "T");
        assert_eq!(buf[(0, 23)].symbol(), "C");
    }

    #[test]
    fn expanded_drawer_covers_the_content_area() {
        static DRAWN: AtomicBool = AtomicBool::new(false);
        let mut state = AppLayoutState::new();
        state.apply(&LayoutMessage::RegisterLeftDrawer(drawer("tools").with_content(
            Arc::new(|_, _| DRAWN.store(true, Ordering::SeqCst)),
        )));
        state.apply(&LayoutMessage::ExpandDrawer { id: "tools".into() });

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        AppLayout::new().render(area, &mut buf, &mut state);

        assert!(DRAWN.load(Ordering::SeqCst));
        // Border of the expanded panel starts at the content edge.
        assert_eq!(buf[(TRIGGER_BAR_WIDTH, 0)].symbol(), "┌");
    }
}
