//! External task-protocol types.
//!
//! These serialize directly to the transport shape clients consume; the
//! serde attributes are the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Task lifecycle states the encoder emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The task is still producing output.
    Working,
    /// The task finished; the terminal synthesized event.
    Completed,
}

/// Message author role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The end user.
    User,
    /// Any agent.
    Agent,
}

/// One content part of a protocol message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessagePart {
    /// Plain text.
    Text {
        /// The text body.
        text: String,
    },
    /// Structured data.
    Data {
        /// Arbitrary structured payload.
        data: Value,
    },
}

/// A protocol message: role, parts, and routing identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    /// Author role.
    pub role: Role,
    /// Ordered content parts.
    pub parts: Vec<MessagePart>,
    /// Unique per-message identifier.
    pub message_id: String,
    /// Task this message belongs to.
    pub task_id: String,
    /// Conversation context (the session ID).
    pub context_id: String,
    /// Per-message metadata, when carried on the message itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Task status snapshot wrapped by a streaming update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Lifecycle state.
    pub state: TaskState,
    /// The message carried by this status.
    pub message: ProtocolMessage,
}

/// One externally visible protocol event.
///
/// Two shapes: streamed (non-final) updates wrap a [`TaskStatus`] and
/// carry metadata on the message; marked updates (the final response
/// and the synthesized completed event) carry state, message, and
/// metadata at the top level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// A streamed, non-final status update.
    TaskStatusUpdate {
        /// Current status and message.
        status: TaskStatus,
        /// Always false for streamed updates.
        #[serde(rename = "final")]
        is_final: bool,
        /// Conversation context.
        context_id: String,
        /// Task identifier.
        task_id: String,
    },
    /// A marked status update: the final response (`working`) or the
    /// synthesized terminal event (`completed`).
    StatusUpdate {
        /// Lifecycle state.
        state: TaskState,
        /// The message body.
        message: ProtocolMessage,
        /// Update-level metadata (final state merged in for the
        /// terminal event).
        metadata: Map<String, Value>,
    },
}

impl ProtocolEvent {
    /// True for the synthesized terminal "completed" event.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            Self::StatusUpdate {
                state: TaskState::Completed,
                ..
            }
        )
    }

    /// The sequence number carried in this event's metadata, if any.
    #[must_use]
    pub fn sequence_no(&self) -> Option<u64> {
        let metadata = match self {
            Self::TaskStatusUpdate { status, .. } => status.message.metadata.as_ref()?,
            Self::StatusUpdate { metadata, .. } => metadata,
        };
        metadata.get("sequenceNo").and_then(Value::as_u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
