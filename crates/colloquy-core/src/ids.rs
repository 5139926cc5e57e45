//! ID generation and epoch-time helpers.

use uuid::Uuid;

/// Generate a new random identifier: 32 lowercase hex characters (uuid4).
///
/// Used for session IDs assigned at create time and message IDs minted
/// during protocol encoding.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time as seconds since the Unix epoch, float precision.
///
/// Event timestamps and session update times are stored in this form.
#[must_use]
pub fn epoch_now() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
