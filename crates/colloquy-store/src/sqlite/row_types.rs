//! Database row types for mapping between `SQLite` rows and Rust structs.
//!
//! These represent the raw database row shape, not the public domain
//! types. Conversion to [`colloquy_core::Session`] and
//! [`colloquy_core::Event`] happens in the store layer, where JSON
//! columns and the actions blob are decoded defensively.

use serde::{Deserialize, Serialize};

/// Raw session row from the `sessions` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRow {
    /// Document key `app_name:user_id:id`.
    pub doc_key: String,
    /// Application name.
    pub app_name: String,
    /// Owning user.
    pub user_id: String,
    /// Session ID.
    pub id: String,
    /// State as a JSON object string.
    pub state: String,
    /// Creation time, seconds since epoch.
    pub create_time: f64,
    /// Last update time, seconds since epoch.
    pub update_time: f64,
    /// Advisory expiry time, seconds since epoch.
    pub ttl: f64,
}

/// Raw event row from the `events` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRow {
    /// Event ID.
    pub id: String,
    /// Owning session document key.
    pub session_key: String,
    /// Application name (denormalized).
    pub app_name: String,
    /// Owning user (denormalized).
    pub user_id: String,
    /// Session ID (denormalized).
    pub session_id: String,
    /// Invocation this event belongs to.
    pub invocation_id: String,
    /// Producer name.
    pub author: String,
    /// Branch within the agent tree.
    pub branch: Option<String>,
    /// Seconds since epoch. `None` only for rows written by a buggy
    /// producer; mapped to "now" at load time.
    pub timestamp: Option<f64>,
    /// Content parts as a JSON array string.
    pub content: Option<String>,
    /// Versioned actions blob.
    pub actions: Option<Vec<u8>>,
    /// Long-running tool IDs as a JSON array string.
    pub long_running_tool_ids: Option<String>,
    /// True while the text response was still streaming.
    pub partial: Option<bool>,
    /// True when the producing turn completed.
    pub turn_complete: Option<bool>,
    /// Producer-reported error code.
    pub error_code: Option<String>,
    /// Producer-reported error message.
    pub error_message: Option<String>,
    /// True when interrupted mid-stream.
    pub interrupted: Option<bool>,
    /// Grounding metadata as a JSON string.
    pub grounding_metadata: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_row_serde_roundtrip() {
        let row = SessionRow {
            doc_key: "app:u1:s1".into(),
            app_name: "app".into(),
            user_id: "u1".into(),
            id: "s1".into(),
            state: r#"{"k":1}"#.into(),
            create_time: 1.0,
            update_time: 2.0,
            ttl: 3.0,
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: SessionRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.doc_key, row.doc_key);
        assert_eq!(back.update_time, row.update_time);
    }

    #[test]
    fn event_row_optional_fields_default() {
        let row = EventRow {
            id: "e1".into(),
            session_key: "app:u1:s1".into(),
            app_name: "app".into(),
            user_id: "u1".into(),
            session_id: "s1".into(),
            invocation_id: String::new(),
            author: "planner".into(),
            branch: None,
            timestamp: Some(5.0),
            content: None,
            actions: None,
            long_running_tool_ids: None,
            partial: None,
            turn_complete: None,
            error_code: None,
            error_message: None,
            interrupted: None,
            grounding_metadata: None,
        };
        assert!(row.content.is_none());
        assert!(row.actions.is_none());
    }
}
