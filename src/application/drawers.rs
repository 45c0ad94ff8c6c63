//! Runtime drawer registration.
//!
//! Host-facing entry points for injecting drawers and feature
//! notifications into the app-layout shell after it has rendered. All of
//! them operate on a [`LayoutBus`] reference; none of them require the
//! shell to exist yet.

use std::sync::Arc;

use ratatui::{buffer::Buffer, layout::Rect};
use tracing::debug;

use crate::application::layout_bus::{LayoutBus, LayoutMessage};

/// Renders a drawer's content area.
pub type DrawerContent = Arc<dyn Fn(Rect, &mut Buffer) + Send + Sync>;

/// Invoked when a drawer opens (`true`) or closes (`false`).
pub type ToggleCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Invoked with the new size after a drawer resize.
pub type ResizeCallback = Arc<dyn Fn(u16) + Send + Sync>;

/// Announceable labels for a drawer's shell and controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AriaLabels {
    /// The drawer region itself.
    pub drawer_name: Option<String>,
    /// The trigger button in the shell's trigger bar.
    pub trigger: Option<String>,
    /// The close control.
    pub close: Option<String>,
    /// The resize handle.
    pub resize_handle: Option<String>,
}

/// Trigger shown in the shell's trigger bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerTrigger {
    /// Single-glyph icon shown in the bar.
    pub icon: String,
    /// Optional text label next to the icon.
    pub label: Option<String>,
}

/// A drawer injected into the shell at runtime.
#[derive(Clone)]
pub struct RuntimeDrawer {
    /// Drawer id. Uniqueness is not validated by the bus; see the
    /// registration entry points for the per-kind guards.
    pub id: String,
    /// Announceable labels.
    pub aria_labels: AriaLabels,
    /// Whether the user may resize the drawer.
    pub resizable: bool,
    /// Initial size in terminal cells.
    pub default_size: u16,
    /// Whether the drawer starts open.
    pub default_active: bool,
    /// Trigger-bar entry.
    pub trigger: DrawerTrigger,
    /// Content renderer.
    pub content: Option<DrawerContent>,
    /// Open/close callback.
    pub on_toggle: Option<ToggleCallback>,
    /// Resize callback.
    pub on_resize: Option<ResizeCallback>,
}

impl RuntimeDrawer {
    /// Default drawer size in terminal cells.
    pub const DEFAULT_SIZE: u16 = 30;

    /// Creates a drawer with defaults: closed, fixed size, no content.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aria_labels: AriaLabels::default(),
            resizable: false,
            default_size: Self::DEFAULT_SIZE,
            default_active: false,
            trigger: DrawerTrigger::default(),
            content: None,
            on_toggle: None,
            on_resize: None,
        }
    }

    /// Builds with announceable labels.
    #[must_use]
    pub fn with_aria_labels(mut self, labels: AriaLabels) -> Self {
        self.aria_labels = labels;
        self
    }

    /// Builds with a resizable drawer body.
    #[must_use]
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Builds with an initial size.
    #[must_use]
    pub const fn with_default_size(mut self, size: u16) -> Self {
        self.default_size = size;
        self
    }

    /// Builds with the drawer initially open.
    #[must_use]
    pub const fn with_default_active(mut self, active: bool) -> Self {
        self.default_active = active;
        self
    }

    /// Builds with a trigger-bar entry.
    #[must_use]
    pub fn with_trigger(mut self, trigger: DrawerTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Builds with a content renderer.
    #[must_use]
    pub fn with_content(mut self, content: DrawerContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Builds with an open/close callback.
    #[must_use]
    pub fn with_on_toggle(mut self, on_toggle: ToggleCallback) -> Self {
        self.on_toggle = Some(on_toggle);
        self
    }

    /// Builds with a resize callback.
    #[must_use]
    pub fn with_on_resize(mut self, on_resize: ResizeCallback) -> Self {
        self.on_resize = Some(on_resize);
        self
    }
}

impl std::fmt::Debug for RuntimeDrawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeDrawer")
            .field("id", &self.id)
            .field("resizable", &self.resizable)
            .field("default_size", &self.default_size)
            .field("default_active", &self.default_active)
            .field("trigger", &self.trigger)
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

/// Shallow config update for a registered drawer.
///
/// Only the fields an update carries are merged; everything else on the
/// registration is left untouched.
#[derive(Clone, Default)]
pub struct DrawerUpdate {
    /// Target drawer id.
    pub id: String,
    /// New announceable labels.
    pub aria_labels: Option<AriaLabels>,
    /// New resizability.
    pub resizable: Option<bool>,
    /// New initial size.
    pub default_size: Option<u16>,
    /// New initial-open flag.
    pub default_active: Option<bool>,
    /// New trigger-bar entry.
    pub trigger: Option<DrawerTrigger>,
    /// New content renderer.
    pub content: Option<DrawerContent>,
}

impl DrawerUpdate {
    /// Creates an empty update for a drawer id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builds with new labels.
    #[must_use]
    pub fn with_aria_labels(mut self, labels: AriaLabels) -> Self {
        self.aria_labels = Some(labels);
        self
    }

    /// Builds with new resizability.
    #[must_use]
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    /// Builds with a new initial size.
    #[must_use]
    pub const fn with_default_size(mut self, size: u16) -> Self {
        self.default_size = Some(size);
        self
    }

    /// Builds with a new initial-open flag.
    #[must_use]
    pub const fn with_default_active(mut self, active: bool) -> Self {
        self.default_active = Some(active);
        self
    }

    /// Builds with a new trigger-bar entry.
    #[must_use]
    pub fn with_trigger(mut self, trigger: DrawerTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Builds with a new content renderer.
    #[must_use]
    pub fn with_content(mut self, content: DrawerContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Merges the carried fields into a drawer config in place.
    pub fn apply_to(&self, drawer: &mut RuntimeDrawer) {
        if let Some(labels) = &self.aria_labels {
            drawer.aria_labels = labels.clone();
        }
        if let Some(resizable) = self.resizable {
            drawer.resizable = resizable;
        }
        if let Some(size) = self.default_size {
            drawer.default_size = size;
        }
        if let Some(active) = self.default_active {
            drawer.default_active = active;
        }
        if let Some(trigger) = &self.trigger {
            drawer.trigger = trigger.clone();
        }
        if let Some(content) = &self.content {
            drawer.content = Some(content.clone());
        }
    }
}

impl std::fmt::Debug for DrawerUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerUpdate")
            .field("id", &self.id)
            .field("resizable", &self.resizable)
            .field("default_size", &self.default_size)
            .field("default_active", &self.default_active)
            .field("trigger", &self.trigger)
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

/// Feature-notifications panel registration.
#[derive(Clone)]
pub struct FeatureNotifications {
    /// Panel id.
    pub id: String,
    /// Panel content renderer.
    pub content: Option<DrawerContent>,
    /// Prompt text shown by `show_feature_prompt_if_possible`.
    pub prompt: Option<String>,
}

impl FeatureNotifications {
    /// Creates an empty panel registration.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: None,
            prompt: None,
        }
    }

    /// Builds with a content renderer.
    #[must_use]
    pub fn with_content(mut self, content: DrawerContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Builds with prompt text.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

impl std::fmt::Debug for FeatureNotifications {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureNotifications")
            .field("id", &self.id)
            .field("prompt", &self.prompt)
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

/// Registers a drawer on the left edge.
///
/// No duplicate-id guard: re-registering the same id buffers a second
/// registration, which a replay-tolerant shell applies as a refresh.
pub fn register_left_drawer(bus: &LayoutBus, drawer: RuntimeDrawer) {
    bus.dispatch(LayoutMessage::RegisterLeftDrawer(drawer));
}

/// Registers a drawer on the bottom edge.
///
/// Unlike the left edge, a bottom registration whose id is already
/// buffered is skipped.
pub fn register_bottom_drawer(bus: &LayoutBus, drawer: RuntimeDrawer) {
    let duplicate = bus.peek_initial_messages().iter().any(|message| {
        matches!(message, LayoutMessage::RegisterBottomDrawer(existing) if existing.id == drawer.id)
    });
    if duplicate {
        debug!(id = %drawer.id, "bottom drawer already registered; skipping");
        return;
    }
    bus.dispatch(LayoutMessage::RegisterBottomDrawer(drawer));
}

/// Registers the feature-notifications panel.
pub fn register_feature_notifications(bus: &LayoutBus, config: FeatureNotifications) {
    bus.dispatch(LayoutMessage::RegisterFeatureNotifications(config));
}

/// Removes any buffered feature-notifications registration.
pub fn clear_feature_notifications(bus: &LayoutBus) {
    bus.clear_feature_notifications();
}

/// Shows the feature prompt, if a notifications panel is registered when
/// the shell handles the message.
pub fn show_feature_prompt_if_possible(bus: &LayoutBus) {
    bus.dispatch(LayoutMessage::ShowFeaturePromptIfPossible);
}

/// Shallow-merges new config into a registered drawer.
pub fn update_drawer(bus: &LayoutBus, update: DrawerUpdate) {
    bus.update_drawer(update);
}

/// Opens a drawer by id.
pub fn open_drawer(bus: &LayoutBus, id: impl Into<String>) {
    bus.dispatch(LayoutMessage::OpenDrawer { id: id.into() });
}

/// Closes a drawer by id.
pub fn close_drawer(bus: &LayoutBus, id: impl Into<String>) {
    bus.dispatch(LayoutMessage::CloseDrawer { id: id.into() });
}

/// Resizes a drawer by id.
pub fn resize_drawer(bus: &LayoutBus, id: impl Into<String>, size: u16) {
    bus.dispatch(LayoutMessage::ResizeDrawer { id: id.into(), size });
}

/// Expands a drawer to cover the content area.
pub fn expand_drawer(bus: &LayoutBus, id: impl Into<String>) {
    bus.dispatch(LayoutMessage::ExpandDrawer { id: id.into() });
}

/// Leaves expanded mode.
pub fn exit_expanded_mode(bus: &LayoutBus) {
    bus.dispatch(LayoutMessage::ExitExpandedMode);
}

/// Whether the shell has installed a handler.
#[must_use]
pub fn is_app_layout_ready(bus: &LayoutBus) -> bool {
    bus.is_ready()
}

/// Resolves once the shell installs a handler.
#[must_use]
pub fn when_app_layout_ready(bus: &LayoutBus) -> tokio::sync::oneshot::Receiver<()> {
    bus.when_ready()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffered_ids(bus: &LayoutBus) -> Vec<(&'static str, String)> {
        bus.peek_initial_messages()
            .iter()
            .map(|message| {
                let id = match message {
                    LayoutMessage::RegisterLeftDrawer(d)
                    | LayoutMessage::RegisterBottomDrawer(d) => d.id.clone(),
                    LayoutMessage::RegisterFeatureNotifications(f) => f.id.clone(),
                    _ => String::new(),
                };
                (message.kind(), id)
            })
            .collect()
    }

    #[test]
    fn left_drawer_registration_has_no_duplicate_guard() {
        let bus = LayoutBus::new();
        register_left_drawer(&bus, RuntimeDrawer::new("tools"));
        register_left_drawer(&bus, RuntimeDrawer::new("tools"));

        assert_eq!(
            buffered_ids(&bus),
            [
                ("register-left-drawer", "tools".to_string()),
                ("register-left-drawer", "tools".to_string()),
            ]
        );
    }

    #[test]
    fn bottom_drawer_registration_skips_duplicates() {
        let bus = LayoutBus::new();
        register_bottom_drawer(&bus, RuntimeDrawer::new("console").with_default_size(12));
        register_bottom_drawer(&bus, RuntimeDrawer::new("console").with_default_size(40));

        let buffered = bus.peek_initial_messages();
        assert_eq!(buffered.len(), 1);
        let LayoutMessage::RegisterBottomDrawer(kept) = &buffered[0] else {
            panic!("expected the first bottom registration");
        };
        assert_eq!(kept.default_size, 12);
    }

    #[test]
    fn feature_notifications_register_and_clear() {
        let bus = LayoutBus::new();
        register_feature_notifications(&bus, FeatureNotifications::new("whats-new"));
        assert_eq!(bus.peek_initial_messages().len(), 1);

        clear_feature_notifications(&bus);
        assert!(bus.peek_initial_messages().is_empty());
    }

    #[test]
    fn feature_prompt_is_one_time() {
        let bus = LayoutBus::new();
        show_feature_prompt_if_possible(&bus);

        assert_eq!(bus.initial_messages().len(), 1);
        assert!(bus.initial_messages().is_empty());
    }

    #[test]
    fn update_merge_is_shallow() {
        let mut drawer = RuntimeDrawer::new("tools")
            .with_default_size(25)
            .with_trigger(DrawerTrigger {
                icon: "T".into(),
                label: Some("Tools".into()),
            });

        DrawerUpdate::new("tools").with_default_size(40).apply_to(&mut drawer);

        assert_eq!(drawer.default_size, 40);
        assert_eq!(drawer.trigger.label.as_deref(), Some("Tools"));
    }
}
