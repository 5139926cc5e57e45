//! Versioned binary codec for the persisted event actions payload.
//!
//! Event actions (state delta, artifact delta, transfer/escalate
//! signals) are stored as an opaque blob on the event document. The
//! wire form is one version byte followed by canonical JSON. Decoding
//! is defensive: an unknown version or corrupt body yields the empty
//! default with a logged warning, never a hard failure.

use colloquy_core::EventActions;
use tracing::warn;

use crate::errors::Result;

/// Current codec version byte.
const CODEC_VERSION: u8 = 1;

/// Encode actions into the versioned blob form.
pub fn encode_actions(actions: &EventActions) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(actions)?;
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(CODEC_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode an actions blob, falling back to the empty default.
///
/// `None` (no blob stored) and empty blobs are valid and decode to the
/// default. Unknown versions and malformed bodies warn and default.
#[must_use]
pub fn decode_actions(bytes: Option<&[u8]>) -> EventActions {
    let Some(bytes) = bytes else {
        return EventActions::default();
    };
    let Some((&version, body)) = bytes.split_first() else {
        return EventActions::default();
    };
    if version != CODEC_VERSION {
        warn!(version, "unknown actions codec version; using defaults");
        return EventActions::default();
    }
    match serde_json::from_slice(body) {
        Ok(actions) => actions,
        Err(err) => {
            warn!(%err, "corrupt actions payload; using defaults");
            EventActions::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_actions() -> EventActions {
        let mut actions = EventActions::default();
        let _ = actions
            .state_delta
            .insert("final_response".into(), json!({"a": 1}));
        let _ = actions.artifact_delta.insert("report.csv".into(), json!(2));
        actions.transfer_to_agent = Some("analyst".into());
        actions
    }

    #[test]
    fn roundtrip() {
        let actions = sample_actions();
        let blob = encode_actions(&actions).unwrap();
        assert_eq!(blob[0], CODEC_VERSION);
        let back = decode_actions(Some(&blob));
        assert_eq!(back, actions);
    }

    #[test]
    fn none_decodes_to_default() {
        assert_eq!(decode_actions(None), EventActions::default());
    }

    #[test]
    fn empty_blob_decodes_to_default() {
        assert_eq!(decode_actions(Some(&[])), EventActions::default());
    }

    #[test]
    fn unknown_version_decodes_to_default() {
        let mut blob = encode_actions(&sample_actions()).unwrap();
        blob[0] = 99;
        assert_eq!(decode_actions(Some(&blob)), EventActions::default());
    }

    #[test]
    fn corrupt_body_decodes_to_default() {
        let blob = vec![CODEC_VERSION, b'{', b'n', b'o'];
        assert_eq!(decode_actions(Some(&blob)), EventActions::default());
    }

    #[test]
    fn default_actions_roundtrip_compactly() {
        let blob = encode_actions(&EventActions::default()).unwrap();
        // Version byte plus "{}".
        assert_eq!(blob.len(), 3);
        assert_eq!(decode_actions(Some(&blob)), EventActions::default());
    }
}
