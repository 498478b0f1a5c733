//! Commands sent from the agent to the chat bot, and the prompt service
//! messages other agents exchange with it

use serde::{Deserialize, Serialize};

use crate::events::ComponentActivatedEvent;
use crate::types::{Destination, InteractionRef, Layout, MessageRef};

/// Send a new message carrying a layout (request/reply)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendLayoutCommand {
    pub destination: Destination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub layout: Layout,
}

/// Reply to a [`SendLayoutCommand`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentLayoutReply {
    pub message: MessageRef,
}

/// Replace the layout on an existing message.
///
/// With `interaction` set the bot answers that interaction with an
/// update-message response; otherwise it edits the message directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateLayoutCommand {
    pub message: MessageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionRef>,
    pub layout: Layout,
}

/// Short-lived notice visible only to the recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EphemeralNoticeCommand {
    pub destination: Destination,
    pub content: String,
}

/// Ask the agent to show a layout and wait for a matching activation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptRequest {
    pub channel_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub layout: Layout,
    /// Only activations by this user are accepted; anyone when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<u64>,
    /// Falls back to the agent's default timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Outcome of a [`PromptRequest`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromptReply {
    Answered { event: Box<ComponentActivatedEvent> },
    TimedOut,
    Rejected { reason: String },
}
