//! Message publishing and subscription helpers

use async_nats::Client;
use futures::StreamExt;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, trace};

use crate::error::{Error, Result};

/// Trait for publishing messages to a transport layer.
/// Implemented by `MessagePublisher` (real NATS) and `MockPublisher` (in-memory, tests).
#[allow(async_fn_in_trait)]
pub trait Publish {
    fn prefix(&self) -> &str;

    async fn publish<T: Serialize>(&self, subject: impl AsRef<str>, message: &T) -> Result<()>;

    /// Publish and wait for a single JSON reply
    async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        subject: impl AsRef<str>,
        message: &T,
    ) -> Result<R>;
}

/// Message publisher for sending commands
#[derive(Clone)]
pub struct MessagePublisher {
    client: Client,
    prefix: String,
}

impl MessagePublisher {
    pub fn new(client: Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Reply to a request received with [`MessageStream::next_with_reply`]
    pub async fn reply<T: Serialize>(&self, reply_to: async_nats::Subject, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message).map_err(Error::Serialization)?;
        self.client
            .publish(reply_to.clone(), payload.into())
            .await
            .map_err(|e| Error::Publish(format!("Failed to reply on {}: {}", reply_to, e)))?;
        debug!("Replied on {}", reply_to);
        Ok(())
    }
}

impl Publish for MessagePublisher {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn publish<T: Serialize>(&self, subject: impl AsRef<str>, message: &T) -> Result<()> {
        let subject = subject.as_ref();
        let payload = serde_json::to_vec(message).map_err(Error::Serialization)?;

        trace!(
            "Publishing to subject: {}, size: {} bytes",
            subject,
            payload.len()
        );

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| Error::Publish(format!("Failed to publish to {}: {}", subject, e)))?;

        debug!("Published message to {}", subject);
        Ok(())
    }

    async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        subject: impl AsRef<str>,
        message: &T,
    ) -> Result<R> {
        let subject = subject.as_ref();
        let payload = serde_json::to_vec(message).map_err(Error::Serialization)?;

        trace!("Requesting on subject: {}", subject);

        let reply = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .map_err(|e| Error::Request(format!("Request to {} failed: {}", subject, e)))?;

        serde_json::from_slice(&reply.payload).map_err(Error::Serialization)
    }
}

/// Message subscriber for receiving events and requests
pub struct MessageSubscriber {
    client: Client,
    prefix: String,
}

impl MessageSubscriber {
    pub fn new(client: Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Subscribe to a subject and deserialize messages
    pub async fn subscribe<T: DeserializeOwned>(
        &self,
        subject: impl AsRef<str>,
    ) -> Result<MessageStream<T>> {
        let subject = subject.as_ref();
        debug!("Subscribing to subject: {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| Error::Subscribe(format!("Failed to subscribe to {}: {}", subject, e)))?;

        Ok(MessageStream {
            subscriber,
            _phantom: std::marker::PhantomData,
        })
    }
}

/// Stream of deserialized messages
pub struct MessageStream<T> {
    subscriber: async_nats::Subscriber,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: DeserializeOwned> MessageStream<T> {
    /// Get the next message from the stream
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.next_with_reply().await.map(|r| r.map(|(data, _)| data))
    }

    /// Get the next message together with its reply subject, if the sender
    /// used request/reply
    pub async fn next_with_reply(&mut self) -> Option<Result<(T, Option<async_nats::Subject>)>> {
        let msg = self.subscriber.next().await?;
        trace!("Received message on subject: {}", msg.subject);

        match serde_json::from_slice(&msg.payload) {
            Ok(data) => Some(Ok((data, msg.reply))),
            Err(e) => {
                error!("Failed to deserialize message on {}: {}", msg.subject, e);
                Some(Err(Error::Serialization(e)))
            }
        }
    }
}
