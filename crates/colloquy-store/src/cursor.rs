//! Opaque page cursor codec for session listing.
//!
//! A cursor encodes the `(last_update_time, last_session_id)` pair of
//! the final item on a page as base64url over compact JSON
//! `{"sid": <string>, "ut": <float seconds>}`. Encoding is
//! deterministic, so the same inputs always produce the same token.
//!
//! Decoding is resilient: any malformed token is treated as "no cursor
//! supplied" with a logged warning, never a hard error.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    sid: String,
    ut: f64,
}

/// Encode a page cursor from the last item of a full page.
#[must_use]
pub fn encode_page_cursor(session_id: &str, update_time: f64) -> String {
    let payload = CursorPayload {
        sid: session_id.to_string(),
        ut: update_time,
    };
    // Struct field order makes the JSON canonical.
    let raw = serde_json::to_string(&payload).unwrap_or_default();
    URL_SAFE.encode(raw)
}

/// Decode a page cursor into `(update_time, session_id)`.
///
/// Returns `None` on any malformed input. Callers must treat `None`
/// exactly like "no cursor supplied".
#[must_use]
pub fn decode_page_cursor(token: &str) -> Option<(f64, String)> {
    match try_decode(token) {
        Some(decoded) => Some(decoded),
        None => {
            warn!("invalid page cursor; starting from the beginning");
            None
        }
    }
}

fn try_decode(token: &str) -> Option<(f64, String)> {
    let raw = URL_SAFE.decode(token).ok()?;
    let payload: CursorPayload = serde_json::from_slice(&raw).ok()?;
    if !payload.ut.is_finite() {
        return None;
    }
    Some((payload.ut, payload.sid))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
