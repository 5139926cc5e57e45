//! Session repository: session document rows and paginated listing.
//!
//! Listing order is `(update_time DESC, id ASC)`; the ascending ID is
//! the tie-break for sessions sharing an update time, which makes the
//! order total and keyset pagination stable.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;
use crate::sqlite::row_types::SessionRow;

/// Session repository. Stateless, every method takes `&Connection`.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session document.
    pub fn insert(conn: &Connection, row: &SessionRow) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO sessions (doc_key, app_name, user_id, id, state, create_time, update_time, ttl)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.doc_key,
                row.app_name,
                row.user_id,
                row.id,
                row.state,
                row.create_time,
                row.update_time,
                row.ttl,
            ],
        )?;
        Ok(())
    }

    /// Get a session document by key.
    pub fn get(conn: &Connection, doc_key: &str) -> Result<Option<SessionRow>> {
        let row = conn
            .query_row(
                "SELECT doc_key, app_name, user_id, id, state, create_time, update_time, ttl
                 FROM sessions WHERE doc_key = ?1",
                params![doc_key],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// List one page of a user's sessions.
    ///
    /// Ordered by `(update_time DESC, id ASC)`. When `start_after` is
    /// given, the page begins strictly after that `(update_time, id)`
    /// position in the same order.
    pub fn list_page(
        conn: &Connection,
        app_name: &str,
        user_id: &str,
        limit: i64,
        start_after: Option<(f64, &str)>,
    ) -> Result<Vec<SessionRow>> {
        let base = "SELECT doc_key, app_name, user_id, id, state, create_time, update_time, ttl
                    FROM sessions WHERE app_name = ?1 AND user_id = ?2";
        let order = " ORDER BY update_time DESC, id ASC LIMIT ?3";

        let rows = if let Some((cursor_ut, cursor_sid)) = start_after {
            let sql = format!(
                "{base} AND (update_time < ?4 OR (update_time = ?4 AND id > ?5)){order}"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![app_name, user_id, limit, cursor_ut, cursor_sid],
                    Self::map_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        } else {
            let sql = format!("{base}{order}");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![app_name, user_id, limit], Self::map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };
        Ok(rows)
    }

    /// Persist merged state and bump the update time and TTL.
    pub fn update_state(
        conn: &Connection,
        doc_key: &str,
        state_json: &str,
        update_time: f64,
        ttl: f64,
    ) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE sessions SET state = ?1, update_time = ?2, ttl = ?3 WHERE doc_key = ?4",
            params![state_json, update_time, ttl, doc_key],
        )?;
        Ok(changed > 0)
    }

    /// Delete a session document. Idempotent.
    pub fn delete(conn: &Connection, doc_key: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM sessions WHERE doc_key = ?1", params![doc_key])?;
        Ok(changed > 0)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
        Ok(SessionRow {
            doc_key: row.get("doc_key")?,
            app_name: row.get("app_name")?,
            user_id: row.get("user_id")?,
            id: row.get("id")?,
            state: row.get("state")?,
            create_time: row.get("create_time")?,
            update_time: row.get("update_time")?,
            ttl: row.get("ttl")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
