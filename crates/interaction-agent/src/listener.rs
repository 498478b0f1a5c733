//! Inbound component activations: NATS → dispatcher

use anyhow::Result;
use interaction_nats::{subjects, MessagePublisher, MessageSubscriber};
use interaction_types::ComponentActivatedEvent;
use interaction_waiters::{ComponentDispatcher, NatsLayoutSurface};
use tracing::{info, warn};

pub type Dispatcher = ComponentDispatcher<NatsLayoutSurface<MessagePublisher>>;

/// Consumes activation events until the subscription closes.
///
/// Events are dispatched one at a time in arrival order. Malformed payloads
/// are logged and skipped.
pub async fn run(subscriber: MessageSubscriber, dispatcher: Dispatcher) -> Result<()> {
    let subject = subjects::bot::component_activated(subscriber.prefix());
    let mut stream = subscriber
        .subscribe::<ComponentActivatedEvent>(&subject)
        .await?;
    info!("Listening for component activations on {}", subject);

    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => {
                dispatcher.dispatch(event).await;
            }
            Err(e) => warn!(error = %e, "Skipping malformed component activation"),
        }
    }

    info!("Component activation subscription closed");
    Ok(())
}
