//! Events published by the chat bot when users activate components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ComponentType, Destination, InteractionRef, Layout, MessageRef, Requester};

/// Base event metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventMetadata {
    /// Unique event ID
    pub event_id: Uuid,
    /// Event timestamp
    pub timestamp: DateTime<Utc>,
    /// Monotonic sequence number
    pub sequence: u64,
}

impl EventMetadata {
    /// Create new event metadata
    pub fn new(sequence: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sequence,
        }
    }
}

/// A control (button/select) on one of our messages was activated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentActivatedEvent {
    pub metadata: EventMetadata,
    pub interaction: InteractionRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub requester: Requester,
    pub custom_id: String,
    pub component_type: ComponentType,
    /// Chosen values for select menus
    #[serde(default)]
    pub values: Vec<String>,
    /// Layout currently shown on the message. Absent for ephemeral or
    /// dismissed messages, which cannot be edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_layout: Option<Layout>,
}

impl ComponentActivatedEvent {
    /// The message the activated control lives on
    pub fn message(&self) -> MessageRef {
        MessageRef {
            channel_id: self.channel_id,
            message_id: self.message_id,
        }
    }

    /// Destination for a reply to this activation
    pub fn reply_destination(&self) -> Destination {
        Destination {
            channel_id: self.channel_id,
            interaction: Some(self.interaction.clone()),
        }
    }
}
