//! Classification of stored events into streaming events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use colloquy_core::{Part, Session, StateMap};

/// What a [`StreamingEvent`] carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingEventKind {
    /// A tool is about to run.
    FunctionCall,
    /// A tool finished running.
    FunctionResponse,
    /// Plain text, possibly a streamed fragment.
    Text,
    /// A complete text response that parsed as structured data.
    Json,
}

impl StreamingEventKind {
    /// Wire name of the kind, as carried in protocol metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FunctionCall => "function_call",
            Self::FunctionResponse => "function_response",
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// One classified event, the intermediate form between storage and the
/// task protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamingEvent {
    /// Producer name (`"user"` or an agent name).
    pub agent: String,
    /// Variant of the event.
    pub kind: StreamingEventKind,
    /// Content: a string for text and function kinds, arbitrary
    /// structured data for [`StreamingEventKind::Json`].
    pub content: Value,
    /// Tool name for the function kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// True on at most one event in a stream: the session's final
    /// response.
    pub is_last_response: bool,
    /// Source event timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Session state snapshot, attached only to the final response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateMap>,
}

impl StreamingEvent {
    fn new(agent: &str, kind: StreamingEventKind, content: Value, timestamp: f64) -> Self {
        Self {
            agent: agent.to_string(),
            kind,
            content,
            function_name: None,
            is_last_response: false,
            timestamp: Some(timestamp),
            state: None,
        }
    }
}

/// Convert a session's event log into an ordered stream of
/// [`StreamingEvent`]s.
///
/// `completion_key` is the state-delta key an agent writes to signal
/// "this is the terminating message". The final response is the last
/// complete text part of the last event carrying that key, falling back
/// to the last agent event overall when no event carries it. At most
/// one output event has `is_last_response = true`; it also carries the
/// session's current state.
///
/// Authorless events and unrecognized part shapes are skipped silently.
#[must_use]
pub fn classify_session(session: &Session, completion_key: &str) -> Vec<StreamingEvent> {
    let agent_events: Vec<_> = session
        .events
        .iter()
        .filter(|e| !e.author.is_empty())
        .collect();
    if agent_events.is_empty() {
        return Vec::new();
    }

    let final_idx = agent_events
        .iter()
        .rposition(|e| e.actions.state_delta.contains_key(completion_key))
        .unwrap_or(agent_events.len() - 1);

    let mut stream = Vec::new();
    // Output index of the latest candidate for the final response; only
    // the last one survives with the marker set.
    let mut final_candidate: Option<usize> = None;

    for (idx, event) in agent_events.iter().enumerate() {
        for part in &event.content {
            match part {
                Part::FunctionCall { name, .. } => {
                    let mut out = StreamingEvent::new(
                        &event.author,
                        StreamingEventKind::FunctionCall,
                        Value::String(format!("Running '{name}'...")),
                        event.timestamp,
                    );
                    out.function_name = Some(name.clone());
                    stream.push(out);
                }
                Part::FunctionResponse { name, .. } => {
                    let mut out = StreamingEvent::new(
                        &event.author,
                        StreamingEventKind::FunctionResponse,
                        Value::String(format!("Finished running '{name}'.")),
                        event.timestamp,
                    );
                    out.function_name = Some(name.clone());
                    stream.push(out);
                }
                Part::Text { text } => {
                    if text.is_empty() {
                        continue;
                    }
                    if event.is_partial() {
                        stream.push(StreamingEvent::new(
                            &event.author,
                            StreamingEventKind::Text,
                            Value::String(text.clone()),
                            event.timestamp,
                        ));
                    } else {
                        // Complete responses may be structured payloads.
                        let (kind, content) = match serde_json::from_str::<Value>(text) {
                            Ok(parsed) => (StreamingEventKind::Json, parsed),
                            Err(_) => (StreamingEventKind::Text, Value::String(text.clone())),
                        };
                        stream.push(StreamingEvent::new(&event.author, kind, content, event.timestamp));
                        if idx == final_idx {
                            final_candidate = Some(stream.len() - 1);
                        }
                    }
                }
            }
        }
    }

    if let Some(i) = final_candidate {
        stream[i].is_last_response = true;
        stream[i].state = Some(session.state.clone());
    }
    stream
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
