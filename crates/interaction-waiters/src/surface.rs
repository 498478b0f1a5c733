//! Seam to the chat platform: send layouts, edit them, post ephemeral notices.

use interaction_nats::{subjects, Publish};
use interaction_types::{
    Destination, EphemeralNoticeCommand, InteractionRef, Layout, MessageRef, SendLayoutCommand,
    SentLayoutReply, UpdateLayoutCommand,
};
use tracing::debug;

use crate::error::SurfaceError;

/// Operations the waiter core needs from the UI collaborator.
/// Implemented by `NatsLayoutSurface` (commands over NATS).
#[allow(async_fn_in_trait)]
pub trait LayoutSurface {
    /// Sends a new message carrying `layout` and returns its address.
    async fn send_layout(
        &self,
        destination: &Destination,
        content: Option<&str>,
        layout: &Layout,
    ) -> Result<MessageRef, SurfaceError>;

    /// Replaces the layout of an existing message, answering `interaction`
    /// when given.
    async fn edit_layout(
        &self,
        message: &MessageRef,
        interaction: Option<&InteractionRef>,
        layout: &Layout,
    ) -> Result<(), SurfaceError>;

    /// Posts a short notice only the recipient can see.
    async fn notify_ephemeral(&self, destination: &Destination, text: &str)
        -> Result<(), SurfaceError>;
}

/// [`LayoutSurface`] that forwards every operation to the chat bot as a NATS
/// command under the publisher's prefix.
#[derive(Clone)]
pub struct NatsLayoutSurface<P> {
    publisher: P,
}

impl<P: Publish> NatsLayoutSurface<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publish> LayoutSurface for NatsLayoutSurface<P> {
    async fn send_layout(
        &self,
        destination: &Destination,
        content: Option<&str>,
        layout: &Layout,
    ) -> Result<MessageRef, SurfaceError> {
        let subject = subjects::agent::layout_send(self.publisher.prefix());
        let command = SendLayoutCommand {
            destination: destination.clone(),
            content: content.map(str::to_string),
            layout: layout.clone(),
        };
        let reply: SentLayoutReply = self.publisher.request(&subject, &command).await?;
        debug!(
            channel_id = reply.message.channel_id,
            message_id = reply.message.message_id,
            "Layout sent"
        );
        Ok(reply.message)
    }

    async fn edit_layout(
        &self,
        message: &MessageRef,
        interaction: Option<&InteractionRef>,
        layout: &Layout,
    ) -> Result<(), SurfaceError> {
        let subject = subjects::agent::layout_update(self.publisher.prefix());
        let command = UpdateLayoutCommand {
            message: *message,
            interaction: interaction.cloned(),
            layout: layout.clone(),
        };
        self.publisher.publish(&subject, &command).await?;
        Ok(())
    }

    async fn notify_ephemeral(
        &self,
        destination: &Destination,
        text: &str,
    ) -> Result<(), SurfaceError> {
        let subject = subjects::agent::notice_ephemeral(self.publisher.prefix());
        let command = EphemeralNoticeCommand {
            destination: destination.clone(),
            content: text.to_string(),
        };
        self.publisher.publish(&subject, &command).await?;
        Ok(())
    }
}
