//! Application layer with the layout bus and drawer registration API.

/// Runtime drawer registration entry points and payloads.
pub mod drawers;
/// The layout message bus.
pub mod layout_bus;

pub use drawers::{
    AriaLabels, DrawerContent, DrawerTrigger, DrawerUpdate, FeatureNotifications, RuntimeDrawer,
};
pub use layout_bus::{HandlerGuard, LayoutBus, LayoutHandler, LayoutMessage, RegisterOutcome};
