//! Prompt service: other agents ask us to show a layout and wait for the
//! answer over NATS request/reply.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use interaction_nats::{subjects, MessagePublisher, MessageSubscriber};
use interaction_types::{Destination, PromptReply, PromptRequest};
use interaction_waiters::{
    accept_all, requester_is, InteractionWaiter, LayoutSurface, NatsLayoutSurface, WaitError,
};
use tracing::{debug, info, warn};

pub type Waiter = InteractionWaiter<NatsLayoutSurface<MessagePublisher>>;

/// Runs one prompt to completion and maps the outcome onto a reply.
pub async fn answer<S: LayoutSurface>(
    waiter: &InteractionWaiter<S>,
    request: PromptRequest,
) -> PromptReply {
    let predicate = match request.requester_id {
        Some(user_id) => requester_is(user_id),
        None => accept_all(),
    };
    let timeout = request.timeout_secs.map(Duration::from_secs);

    let outcome = waiter
        .send_and_wait(
            &Destination::channel(request.channel_id),
            request.content.as_deref(),
            &request.layout,
            predicate,
            timeout,
        )
        .await;

    match outcome {
        Ok(event) => {
            debug!(
                custom_id = %event.custom_id,
                requester = event.requester.id,
                "Prompt answered"
            );
            PromptReply::Answered {
                event: Box::new(event),
            }
        }
        Err(WaitError::Timeout(_)) => PromptReply::TimedOut,
        Err(e) => {
            warn!(channel_id = request.channel_id, error = %e, "Prompt rejected");
            PromptReply::Rejected {
                reason: e.to_string(),
            }
        }
    }
}

/// Serves prompt requests until the subscription closes. Each request is
/// answered from its own task.
pub async fn run(
    subscriber: MessageSubscriber,
    waiter: Arc<Waiter>,
    publisher: MessagePublisher,
) -> Result<()> {
    let subject = subjects::agent::prompt(subscriber.prefix());
    let mut stream = subscriber.subscribe::<PromptRequest>(&subject).await?;
    info!("Serving prompts on {}", subject);

    while let Some(item) = stream.next_with_reply().await {
        let (request, reply_to) = match item {
            Ok((request, Some(reply_to))) => (request, reply_to),
            Ok((request, None)) => {
                warn!(
                    channel_id = request.channel_id,
                    "Prompt request without reply subject, ignoring"
                );
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed prompt request");
                continue;
            }
        };

        let waiter = Arc::clone(&waiter);
        let publisher = publisher.clone();
        tokio::spawn(async move {
            let reply = answer(&waiter, request).await;
            if let Err(e) = publisher.reply(reply_to, &reply).await {
                warn!(error = %e, "Failed to deliver prompt reply");
            }
        });
    }

    info!("Prompt subscription closed");
    Ok(())
}
