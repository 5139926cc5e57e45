//! Event types: immutable entries in a session's ordered log.
//!
//! An [`Event`] is appended once and never mutated; only the owning
//! session's state and update time change afterward. Content is a
//! sequence of [`Part`]s, each exactly one of text, function call, or
//! function response. An explicit tagged union matched exhaustively
//! rather than probed for attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::StateMap;

/// One content part of an event. Variants are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain (possibly streamed) text.
    Text {
        /// The text content.
        text: String,
    },
    /// A tool invocation issued by an agent.
    FunctionCall {
        /// Tool name.
        name: String,
        /// Call arguments as a JSON object.
        args: Value,
    },
    /// The result of a prior tool invocation.
    FunctionResponse {
        /// Tool name.
        name: String,
        /// Result payload.
        result: Value,
    },
}

/// Side effects an event carries beyond its content.
///
/// `state_delta` is merged into the session state at append time (keys
/// prefixed `temp:` are dropped before persistence). The remaining
/// fields mirror what producing agents record; the store persists them
/// opaquely via the versioned actions codec.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventActions {
    /// State keys to merge into the session (last write wins).
    #[serde(default, skip_serializing_if = "StateMap::is_empty")]
    pub state_delta: StateMap,
    /// Artifact name → version written during this event.
    #[serde(default, skip_serializing_if = "StateMap::is_empty")]
    pub artifact_delta: StateMap,
    /// Agent to hand the conversation to next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_to_agent: Option<String>,
    /// Whether the event escalates to a parent agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate: Option<bool>,
    /// Auth configurations requested by tools in this event.
    #[serde(default, skip_serializing_if = "StateMap::is_empty")]
    pub requested_auth_configs: StateMap,
}

impl EventActions {
    /// True when no field carries any payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state_delta.is_empty()
            && self.artifact_delta.is_empty()
            && self.transfer_to_agent.is_none()
            && self.escalate.is_none()
            && self.requested_auth_configs.is_empty()
    }
}

/// A single immutable event in a session's log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event ID.
    pub id: String,
    /// Invocation this event belongs to.
    #[serde(default)]
    pub invocation_id: String,
    /// Producer name: `"user"` or an agent name. Empty means authorless.
    pub author: String,
    /// Branch within the agent tree, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Seconds since epoch, float precision.
    pub timestamp: f64,
    /// Ordered content parts.
    #[serde(default)]
    pub content: Vec<Part>,
    /// Side effects carried by this event.
    #[serde(default, skip_serializing_if = "EventActions::is_empty")]
    pub actions: EventActions,
    /// IDs of long-running tools started by this event.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub long_running_tool_ids: BTreeSet<String>,
    /// True while a text response is still streaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
    /// True when the producing turn is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_complete: Option<bool>,
    /// Producer-reported error code, if the event failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Producer-reported error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// True when the event was interrupted mid-stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<bool>,
    /// Grounding metadata recorded by the producer, stored opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<Value>,
}

impl Event {
    /// Build a minimal event: id, author, timestamp, content. Everything
    /// else defaults.
    #[must_use]
    pub fn new(id: impl Into<String>, author: impl Into<String>, timestamp: f64) -> Self {
        Self {
            id: id.into(),
            invocation_id: String::new(),
            author: author.into(),
            branch: None,
            timestamp,
            content: Vec::new(),
            actions: EventActions::default(),
            long_running_tool_ids: BTreeSet::new(),
            partial: None,
            turn_complete: None,
            error_code: None,
            error_message: None,
            interrupted: None,
            grounding_metadata: None,
        }
    }

    /// Whether the event is a still-streaming text chunk.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.partial == Some(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
