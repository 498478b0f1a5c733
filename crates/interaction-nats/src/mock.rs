//! In-memory mock publisher for unit testing without a real NATS connection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::messaging::Publish;

/// Captured publish: (full subject string, JSON value of the message)
pub type CapturedMessage = (String, serde_json::Value);

/// In-memory publisher that records all published messages and answers
/// requests from a queue of canned replies.
///
/// # Example
/// ```rust,ignore
/// let mock = MockPublisher::new("test");
/// mock.push_reply(serde_json::json!({"message": {"channel_id": 1, "message_id": 2}}));
/// surface.send_layout(&dest, None, &layout).await.unwrap();
/// assert_eq!(mock.published_messages()[0].0, "interaction.test.agent.layout.send");
/// ```
#[derive(Clone)]
pub struct MockPublisher {
    prefix: String,
    messages: Arc<Mutex<Vec<CapturedMessage>>>,
    replies: Arc<Mutex<VecDeque<serde_json::Value>>>,
    fail_publishes: Arc<Mutex<bool>>,
}

impl MockPublisher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            messages: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fail_publishes: Arc::new(Mutex::new(false)),
        }
    }

    /// Queue the JSON reply returned by the next `request` call.
    pub fn push_reply(&self, reply: serde_json::Value) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Make every subsequent publish fail with `Error::Publish`.
    pub fn fail_publishes(&self, fail: bool) {
        *self.fail_publishes.lock().unwrap() = fail;
    }

    /// Snapshot of all captured (subject, value) pairs in publish order,
    /// requests included.
    pub fn published_messages(&self) -> Vec<CapturedMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Captured messages published to `subject`
    pub fn messages_on(&self, subject: &str) -> Vec<serde_json::Value> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == subject)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }

    fn capture<T: Serialize>(&self, subject: &str, message: &T) -> Result<()> {
        if *self.fail_publishes.lock().unwrap() {
            return Err(Error::Publish(format!("mock publish to {} failed", subject)));
        }
        let value = serde_json::to_value(message).map_err(Error::Serialization)?;
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), value));
        Ok(())
    }
}

impl Publish for MockPublisher {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn publish<T: Serialize>(&self, subject: impl AsRef<str>, message: &T) -> Result<()> {
        self.capture(subject.as_ref(), message)
    }

    async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        subject: impl AsRef<str>,
        message: &T,
    ) -> Result<R> {
        let subject = subject.as_ref();
        self.capture(subject, message)?;
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Request(format!("no responders on {}", subject)))?;
        serde_json::from_value(reply).map_err(Error::Serialization)
    }
}
