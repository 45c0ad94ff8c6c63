//! Layout message bus.
//!
//! An injectable mailbox connecting host code to the app-layout shell.
//! Hosts push registration messages before the shell exists; the shell
//! installs a handler, replays the buffered messages in push order, and
//! from then on receives every message synchronously. The bus is shared by
//! cloning (`Arc` inside), so registrants and the consuming widget hold
//! the same instance without any global state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::drawers::{DrawerUpdate, FeatureNotifications, RuntimeDrawer};

/// Messages understood by the app-layout shell.
///
/// The payload shape is fixed per variant; hosts and the shell agree on
/// this enum as the whole protocol surface.
#[derive(Debug, Clone)]
pub enum LayoutMessage {
    /// Register a drawer on the left edge of the shell.
    RegisterLeftDrawer(RuntimeDrawer),
    /// Register a drawer on the bottom edge of the shell.
    RegisterBottomDrawer(RuntimeDrawer),
    /// Register the feature-notifications panel.
    RegisterFeatureNotifications(FeatureNotifications),
    /// Shallow-merge new fields into a registered drawer's config.
    UpdateDrawerConfig(DrawerUpdate),
    /// Open the drawer with the given id.
    OpenDrawer {
        /// Target drawer id.
        id: String,
    },
    /// Close the drawer with the given id.
    CloseDrawer {
        /// Target drawer id.
        id: String,
    },
    /// Resize the drawer with the given id.
    ResizeDrawer {
        /// Target drawer id.
        id: String,
        /// Requested size in terminal cells.
        size: u16,
    },
    /// Expand the drawer with the given id to cover the content area.
    ExpandDrawer {
        /// Target drawer id.
        id: String,
    },
    /// Leave expanded mode, restoring the regular layout.
    ExitExpandedMode,
    /// Show the feature prompt if a notifications panel is registered.
    ShowFeaturePromptIfPossible,
}

impl LayoutMessage {
    /// One-time messages are removed from the initial buffer after being
    /// read once; registrations persist until superseded.
    #[must_use]
    pub const fn is_one_time(&self) -> bool {
        matches!(
            self,
            Self::OpenDrawer { .. }
                | Self::CloseDrawer { .. }
                | Self::ResizeDrawer { .. }
                | Self::ExpandDrawer { .. }
                | Self::ExitExpandedMode
                | Self::ShowFeaturePromptIfPossible
        )
    }

    /// Short tag for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RegisterLeftDrawer(_) => "register-left-drawer",
            Self::RegisterBottomDrawer(_) => "register-bottom-drawer",
            Self::RegisterFeatureNotifications(_) => "register-feature-notifications",
            Self::UpdateDrawerConfig(_) => "update-drawer-config",
            Self::OpenDrawer { .. } => "open-drawer",
            Self::CloseDrawer { .. } => "close-drawer",
            Self::ResizeDrawer { .. } => "resize-drawer",
            Self::ExpandDrawer { .. } => "expand-drawer",
            Self::ExitExpandedMode => "exit-expanded-mode",
            Self::ShowFeaturePromptIfPossible => "show-feature-prompt",
        }
    }
}

/// Receiver side of the bus, implemented by the app-layout shell.
#[cfg_attr(test, mockall::automock)]
pub trait LayoutHandler: Send {
    /// Handles one message, synchronously on the calling thread.
    fn handle(&mut self, message: &LayoutMessage);
}

/// Result of installing a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// No handler was present.
    Installed,
    /// A previous handler was overwritten (last-writer-wins).
    Replaced,
}

type HandlerSlot = Arc<Mutex<Box<dyn LayoutHandler>>>;

#[derive(Default)]
struct BusInner {
    buffer: Vec<LayoutMessage>,
    handler: Option<HandlerSlot>,
    waiters: Vec<oneshot::Sender<()>>,
}

/// Clears the active handler when the shell unmounts.
///
/// Clearing never touches the message buffer, so a remounting shell can
/// replay the surviving registrations.
#[must_use = "keep the guard and call unregister when the shell unmounts"]
pub struct HandlerGuard {
    bus: LayoutBus,
}

impl HandlerGuard {
    /// Removes the currently installed handler.
    pub fn unregister(self) {
        let mut inner = self.bus.inner.lock();
        inner.handler = None;
        debug!("layout handler unregistered");
    }
}

/// The shared layout message bus.
#[derive(Clone, Default)]
pub struct LayoutBus {
    inner: Arc<Mutex<BusInner>>,
}

impl LayoutBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the initial buffer without any live delivery.
    ///
    /// Never deduplicates by id; pushing the same registration twice
    /// buffers it twice.
    pub fn push_initial_message(&self, message: LayoutMessage) {
        self.inner.lock().buffer.push(message);
    }

    /// Buffers a message and forwards it to the live handler if one is
    /// installed.
    ///
    /// A registration dispatched after the shell is mounted is therefore
    /// delivered twice in effect: once live, and once more if the initial
    /// buffer is re-read. Handlers must be idempotent to registration
    /// replay.
    pub fn dispatch(&self, message: LayoutMessage) {
        debug!(kind = message.kind(), "dispatching layout message");
        let slot = {
            let mut inner = self.inner.lock();
            inner.buffer.push(message.clone());
            inner.handler.clone()
        };
        if let Some(slot) = slot {
            slot.lock().handle(&message);
        }
    }

    /// Shallow-merges a config update into any buffered registration with
    /// a matching id, then forwards the update live.
    ///
    /// With no handler installed the live event is silently dropped, but
    /// the buffer merge persists: a late-mounting shell picks up the
    /// merged config from the initial buffer without seeing the event.
    pub fn update_drawer(&self, update: DrawerUpdate) {
        let slot = {
            let mut inner = self.inner.lock();
            for message in &mut inner.buffer {
                match message {
                    LayoutMessage::RegisterLeftDrawer(drawer)
                    | LayoutMessage::RegisterBottomDrawer(drawer)
                        if drawer.id == update.id =>
                    {
                        update.apply_to(drawer);
                    }
                    _ => {}
                }
            }
            inner.handler.clone()
        };
        if let Some(slot) = slot {
            slot.lock().handle(&LayoutMessage::UpdateDrawerConfig(update));
        } else {
            debug!(id = %update.id, "no layout handler; drawer update kept in buffer only");
        }
    }

    /// Installs the single active handler, resolving pending readiness
    /// waiters.
    ///
    /// A second registration warns and overwrites the first; the explicit
    /// outcome lets tests assert on the replacement without capturing
    /// logs.
    pub fn register_handler(
        &self,
        handler: Box<dyn LayoutHandler>,
    ) -> (RegisterOutcome, HandlerGuard) {
        let outcome = {
            let mut inner = self.inner.lock();
            let outcome = if inner.handler.is_some() {
                warn!("layout handler already registered; replacing it");
                RegisterOutcome::Replaced
            } else {
                RegisterOutcome::Installed
            };
            inner.handler = Some(Arc::new(Mutex::new(handler)));
            for waiter in inner.waiters.drain(..) {
                // A dropped receiver makes this a no-op.
                let _ = waiter.send(());
            }
            outcome
        };
        (outcome, HandlerGuard { bus: self.clone() })
    }

    /// Returns the buffered messages in push order and drains the
    /// one-time subset from the buffer.
    #[must_use]
    pub fn initial_messages(&self) -> Vec<LayoutMessage> {
        let mut inner = self.inner.lock();
        let messages = inner.buffer.clone();
        inner.buffer.retain(|message| !message.is_one_time());
        messages
    }

    /// Non-draining snapshot of the buffer, for presence checks.
    #[must_use]
    pub fn peek_initial_messages(&self) -> Vec<LayoutMessage> {
        self.inner.lock().buffer.clone()
    }

    /// Drops any buffered feature-notifications registration.
    ///
    /// Buffer-only: a shell that already consumed the registration keeps
    /// its panel until it re-reads the buffer.
    pub fn clear_feature_notifications(&self) {
        self.inner
            .lock()
            .buffer
            .retain(|message| !matches!(message, LayoutMessage::RegisterFeatureNotifications(_)));
    }

    /// Whether a handler is currently installed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.lock().handler.is_some()
    }

    /// Resolves once a handler is installed.
    ///
    /// Resolves immediately when one already is; otherwise the returned
    /// receiver fires exactly once at the next successful registration.
    /// Dropping the receiver cancels the wait.
    #[must_use]
    pub fn when_ready(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        if inner.handler.is_some() {
            let _ = tx.send(());
        } else {
            inner.waiters.push(tx);
        }
        rx
    }
}
