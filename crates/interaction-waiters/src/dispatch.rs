//! Runs the resolution protocol for each inbound component activation and
//! degrades the UI when no pending waiter takes the event.

#[path = "dispatch_tests.rs"]
mod dispatch_tests;

use std::sync::Arc;

use interaction_types::ComponentActivatedEvent;
use tracing::{debug, warn};

use crate::registry::{Resolution, WaiterRegistry};
use crate::surface::LayoutSurface;

/// Notice shown when an activated control no longer has a waiter.
pub const DEFAULT_STALE_NOTICE: &str = "❗That component could not be found!\nThis could be due to an outage, please try the original action again.";

pub struct ComponentDispatcher<S> {
    registry: Arc<WaiterRegistry<ComponentActivatedEvent>>,
    surface: S,
    notice: String,
}

impl<S: LayoutSurface> ComponentDispatcher<S> {
    pub fn new(registry: Arc<WaiterRegistry<ComponentActivatedEvent>>, surface: S) -> Self {
        Self {
            registry,
            surface,
            notice: DEFAULT_STALE_NOTICE.to_string(),
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    pub fn registry(&self) -> &Arc<WaiterRegistry<ComponentActivatedEvent>> {
        &self.registry
    }

    /// Routes one activation. Never fails: when the event resolves nothing,
    /// the degrade path runs and its delivery errors are only logged.
    pub async fn dispatch(&self, event: ComponentActivatedEvent) -> Resolution {
        let resolution = self.registry.resolve(&event.custom_id, &event);
        if resolution.is_resolved() {
            debug!(
                custom_id = %event.custom_id,
                requester = event.requester.id,
                "Component activation resolved a waiter"
            );
        } else {
            debug!(
                custom_id = %event.custom_id,
                ?resolution,
                "Component activation matched no pending waiter"
            );
            self.degrade(&event).await;
        }
        resolution
    }

    async fn degrade(&self, event: &ComponentActivatedEvent) {
        let destination = event.reply_destination();

        // ephemeral or dismissed messages cannot be edited
        let Some(visible) = &event.visible_layout else {
            if let Err(e) = self.surface.notify_ephemeral(&destination, &self.notice).await {
                warn!(custom_id = %event.custom_id, error = %e, "Failed to send stale-control notice");
            }
            return;
        };

        let mut layout = visible.clone();
        let disabled = layout.disable_matching(&event.custom_id);
        debug!(custom_id = %event.custom_id, disabled, "Disabling stale controls");

        if let Err(e) = self
            .surface
            .edit_layout(&event.message(), Some(&event.interaction), &layout)
            .await
        {
            warn!(
                custom_id = %event.custom_id,
                message_id = event.message_id,
                error = %e,
                "Failed to disable stale controls"
            );
        }

        if let Err(e) = self.surface.notify_ephemeral(&destination, &self.notice).await {
            warn!(custom_id = %event.custom_id, error = %e, "Failed to send stale-control notice");
        }
    }
}
