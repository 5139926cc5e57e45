//! Encoding of streaming events into sequenced protocol events.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use colloquy_core::{new_id, StateMap};

use crate::streaming::{StreamingEvent, StreamingEventKind};
use crate::task::{MessagePart, ProtocolEvent, ProtocolMessage, Role, TaskState, TaskStatus};

/// Agent name stamped on the synthesized terminal event.
const TERMINAL_AGENT: &str = "Orchestrator";

/// Body of the synthesized terminal event.
const TERMINAL_BODY: &str = "done";

/// Encode a classified stream into ordered protocol events.
///
/// `context_id` is the session ID; `task_id` is generated once when not
/// supplied and reused for every event in the call. The sequence
/// counter advances once per input event, empty ones included, so
/// sequence numbers reflect input position. If the stream contains a
/// final response, one extra terminal "completed" event is synthesized
/// carrying the captured session state; it always sorts last. All
/// output is stable-sorted by timestamp ascending with missing
/// timestamps at the end.
#[must_use]
pub fn encode_events(
    stream: &[StreamingEvent],
    context_id: &str,
    task_id: Option<&str>,
) -> Vec<ProtocolEvent> {
    let task_id = task_id.map_or_else(new_id, ToString::to_string);

    let mut out: Vec<(ProtocolEvent, Option<f64>)> = Vec::new();
    let mut final_state: Option<StateMap> = None;
    let mut seq: u64 = 0;

    for event in stream {
        seq += 1;
        if content_is_empty(&event.content) {
            continue;
        }

        let role = if event.agent == "user" {
            Role::User
        } else {
            Role::Agent
        };
        let part = content_part(event);

        if event.is_last_response {
            let message = ProtocolMessage {
                role,
                parts: vec![part],
                message_id: new_id(),
                task_id: task_id.clone(),
                context_id: context_id.to_string(),
                metadata: None,
            };
            let mut metadata = Map::new();
            let _ = metadata.insert("type".into(), Value::from(event.kind.as_str()));
            let _ = metadata.insert("finished".into(), Value::Bool(false));
            let _ = metadata.insert("lastResponse".into(), Value::Bool(true));
            let _ = metadata.insert("agent".into(), Value::from(event.agent.clone()));
            let _ = metadata.insert("sequenceNo".into(), Value::from(seq));

            out.push((
                ProtocolEvent::StatusUpdate {
                    state: TaskState::Working,
                    message,
                    metadata,
                },
                event.timestamp,
            ));
            final_state.clone_from(&event.state);
        } else {
            let mut metadata = Map::new();
            let _ = metadata.insert("type".into(), Value::from(event.kind.as_str()));
            let _ = metadata.insert("lastResponse".into(), Value::Bool(false));
            let _ = metadata.insert("finished".into(), Value::Bool(false));
            let _ = metadata.insert("agent".into(), Value::from(event.agent.clone()));
            if let Some(name) = &event.function_name {
                let _ = metadata.insert("function_name".into(), Value::from(name.clone()));
            }
            let _ = metadata.insert("sequenceNo".into(), Value::from(seq));

            let message = ProtocolMessage {
                role,
                parts: vec![part],
                message_id: new_id(),
                task_id: task_id.clone(),
                context_id: context_id.to_string(),
                metadata: Some(metadata),
            };
            out.push((
                ProtocolEvent::TaskStatusUpdate {
                    status: TaskStatus {
                        state: TaskState::Working,
                        message,
                    },
                    is_final: false,
                    context_id: context_id.to_string(),
                    task_id: task_id.clone(),
                },
                event.timestamp,
            ));
        }
    }

    if let Some(state) = final_state {
        // Merged metadata: session state first, protocol markers win on
        // key collisions.
        let mut metadata = state;
        let _ = metadata.insert("type".into(), Value::from("status"));
        let _ = metadata.insert("lastResponse".into(), Value::Bool(true));
        let _ = metadata.insert("turnComplete".into(), Value::Bool(true));
        let _ = metadata.insert("agent".into(), Value::from(TERMINAL_AGENT));
        let _ = metadata.insert("sequenceNo".into(), Value::from(seq + 1));

        // Must sort after everything already emitted: the maximum seen
        // timestamp, or unset if any emitted event lacks one (unset
        // sorts last, and the stable sort keeps this event behind the
        // other unset ones).
        let timestamp = if out.iter().all(|(_, ts)| ts.is_some()) {
            out.iter()
                .filter_map(|(_, ts)| *ts)
                .fold(None, |acc: Option<f64>, ts| {
                    Some(acc.map_or(ts, |m| m.max(ts)))
                })
        } else {
            None
        };

        let message = ProtocolMessage {
            role: Role::Agent,
            parts: vec![MessagePart::Text {
                text: TERMINAL_BODY.to_string(),
            }],
            message_id: new_id(),
            task_id: task_id.clone(),
            context_id: context_id.to_string(),
            metadata: None,
        };
        out.push((
            ProtocolEvent::StatusUpdate {
                state: TaskState::Completed,
                message,
                metadata,
            },
            timestamp,
        ));
    }

    // Stable sort: missing timestamps keep their emission order at the
    // end.
    out.sort_by(|(_, a), (_, b)| compare_timestamps(*a, *b));
    out.into_iter().map(|(event, _)| event).collect()
}

fn compare_timestamps(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn content_part(event: &StreamingEvent) -> MessagePart {
    match event.kind {
        StreamingEventKind::Json => MessagePart::Data {
            data: event.content.clone(),
        },
        _ => MessagePart::Text {
            text: content_text(&event.content),
        },
    }
}

fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Empty content is skipped by the encoder (but still sequenced).
fn content_is_empty(content: &Value) -> bool {
    match content {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(true) => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
