//! Event repository: the per-session ordered event sub-collection.
//!
//! Events are immutable and append-only. Reads are always ordered by
//! timestamp ascending; the optional `after_timestamp` bound is applied
//! server-side as `timestamp >= ?`.

use rusqlite::{params, Connection};

use crate::errors::Result;
use crate::sqlite::row_types::EventRow;

/// Event repository. Stateless, every method takes `&Connection`.
pub struct EventRepo;

impl EventRepo {
    /// Insert a single event row.
    pub fn insert(conn: &Connection, row: &EventRow) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO events (id, session_key, app_name, user_id, session_id, invocation_id,
             author, branch, timestamp, content, actions, long_running_tool_ids, partial,
             turn_complete, error_code, error_message, interrupted, grounding_metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                row.id,
                row.session_key,
                row.app_name,
                row.user_id,
                row.session_id,
                row.invocation_id,
                row.author,
                row.branch,
                row.timestamp,
                row.content,
                row.actions,
                row.long_running_tool_ids,
                row.partial,
                row.turn_complete,
                row.error_code,
                row.error_message,
                row.interrupted,
                row.grounding_metadata,
            ],
        )?;
        Ok(())
    }

    /// List a session's events ordered by timestamp ascending.
    ///
    /// `after_timestamp`, when set, restricts the query to events at or
    /// after that time.
    pub fn list_for_session(
        conn: &Connection,
        session_key: &str,
        after_timestamp: Option<f64>,
    ) -> Result<Vec<EventRow>> {
        let base = "SELECT id, session_key, app_name, user_id, session_id, invocation_id,
                    author, branch, timestamp, content, actions, long_running_tool_ids, partial,
                    turn_complete, error_code, error_message, interrupted, grounding_metadata
                    FROM events WHERE session_key = ?1";

        let rows = if let Some(after) = after_timestamp {
            let sql = format!("{base} AND timestamp >= ?2 ORDER BY timestamp ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![session_key, after], Self::map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        } else {
            let sql = format!("{base} ORDER BY timestamp ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![session_key], Self::map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };
        Ok(rows)
    }

    /// Delete every event belonging to a session. Idempotent; returns
    /// the number of rows removed.
    pub fn delete_for_session(conn: &Connection, session_key: &str) -> Result<usize> {
        let deleted = conn.execute(
            "DELETE FROM events WHERE session_key = ?1",
            params![session_key],
        )?;
        Ok(deleted)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
        Ok(EventRow {
            id: row.get("id")?,
            session_key: row.get("session_key")?,
            app_name: row.get("app_name")?,
            user_id: row.get("user_id")?,
            session_id: row.get("session_id")?,
            invocation_id: row.get("invocation_id")?,
            author: row.get("author")?,
            branch: row.get("branch")?,
            timestamp: row.get("timestamp")?,
            content: row.get("content")?,
            actions: row.get("actions")?,
            long_running_tool_ids: row.get("long_running_tool_ids")?,
            partial: row.get("partial")?,
            turn_complete: row.get("turn_complete")?,
            error_code: row.get("error_code")?,
            error_message: row.get("error_message")?,
            interrupted: row.get("interrupted")?,
            grounding_metadata: row.get("grounding_metadata")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
