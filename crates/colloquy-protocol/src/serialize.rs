//! Flattening of protocol events into plain JSON for transport.

use serde_json::Value;
use tracing::warn;

use crate::task::ProtocolEvent;

/// Flatten protocol events into plain JSON values.
///
/// An event that fails to serialize (which would take a pathological
/// payload) is replaced by an error marker rather than failing the
/// whole response.
#[must_use]
pub fn to_external_json(events: &[ProtocolEvent]) -> Vec<Value> {
    events
        .iter()
        .map(|event| match serde_json::to_value(event) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "unserializable protocol event");
                serde_json::json!({"error": "unable to serialize event"})
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
