//! High-level [`SessionStore`] API over the connection pool.
//!
//! Implements the session document contract:
//!
//! - `create` assigns an ID when absent, strips `temp:` state keys from
//!   the persisted copy (the returned session keeps them), and stamps a
//!   TTL 180 days out.
//! - `get` auto-creates an empty session when the document is absent, so
//!   reads never fail with "not found".
//! - `list` pages by `(update_time DESC, id ASC)` keyset with opaque
//!   cursors; a next cursor is emitted iff the page is full.
//! - `append_event` performs two independent writes (event insert, then
//!   session state/update time). There is deliberately no transaction
//!   across them: a crash in between leaves an event persisted but not
//!   reflected in `update_time`, and readers filter it out until a later
//!   append succeeds.
//! - `delete` removes events first, then the document; idempotent.

use tracing::{debug, warn};

use colloquy_core::{
    epoch_now, new_id, strip_temp_keys, Event, GetSessionFilter, Part, Session, StateMap,
    TEMP_STATE_PREFIX,
};

use crate::actions::{decode_actions, encode_actions};
use crate::cursor::{decode_page_cursor, encode_page_cursor};
use crate::errors::{Result, StoreError};
use crate::sqlite::connection::{ConnectionPool, PooledConnection};
use crate::sqlite::repositories::{EventRepo, SessionRepo};
use crate::sqlite::row_types::{EventRow, SessionRow};

/// Sessions expire (advisorily) 180 days after their last write.
const SESSION_TTL_SECS: f64 = 180.0 * 86_400.0;

/// Page size bounds for listing.
const MIN_PAGE_SIZE: u32 = 1;
const MAX_PAGE_SIZE: u32 = 50;

/// One page of a user's sessions plus the cursor for the next page.
#[derive(Debug)]
pub struct ListPage {
    /// Sessions in `(update_time DESC, id ASC)` order, event logs empty.
    pub sessions: Vec<Session>,
    /// Present iff the page came back full ("maybe more").
    pub next_cursor: Option<String>,
}

/// Session document store backed by the `SQLite` pool.
pub struct SessionStore {
    pool: ConnectionPool,
}

impl SessionStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Create a session.
    ///
    /// Assigns a fresh random ID when `session_id` is `None`. The
    /// persisted state has `temp:` keys stripped; the returned session
    /// carries the state as given.
    pub fn create(
        &self,
        app_name: &str,
        user_id: &str,
        state: Option<StateMap>,
        session_id: Option<&str>,
    ) -> Result<Session> {
        let now = epoch_now();
        let sid = session_id.map_or_else(new_id, ToString::to_string);
        let state = state.unwrap_or_default();

        let row = SessionRow {
            doc_key: doc_key(app_name, user_id, &sid),
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            id: sid.clone(),
            state: serde_json::to_string(&strip_temp_keys(&state))?,
            create_time: now,
            update_time: now,
            ttl: now + SESSION_TTL_SECS,
        };
        let conn = self.conn()?;
        SessionRepo::insert(&conn, &row)?;
        debug!(app_name, user_id, session_id = %sid, "session created");

        let mut session = Session::new(app_name, user_id, sid, now);
        session.state = state;
        Ok(session)
    }

    /// Get a session with its event log.
    ///
    /// An absent document is auto-created empty (idempotent bootstrap).
    /// Events newer than the session's `update_time` are discarded, so
    /// they belong to an append whose state snapshot has not landed yet.
    pub fn get(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        filter: Option<&GetSessionFilter>,
    ) -> Result<Session> {
        let key = doc_key(app_name, user_id, session_id);
        let conn = self.conn()?;
        let Some(row) = SessionRepo::get(&conn, &key)? else {
            debug!(app_name, user_id, session_id, "session absent, auto-creating");
            drop(conn);
            return self.create(app_name, user_id, None, Some(session_id));
        };

        let mut session = row_to_session(&row);
        let after = filter.and_then(|f| f.after_timestamp);
        let mut events: Vec<Event> = EventRepo::list_for_session(&conn, &key, after)?
            .iter()
            .map(row_to_event)
            .collect();

        // Read consistency: drop events appended after the state snapshot.
        events.retain(|e| e.timestamp <= row.update_time);

        if let Some(filter) = filter {
            if let Some(n) = filter.num_recent_events {
                if events.len() > n {
                    let _ = events.drain(..events.len() - n);
                }
            } else if let Some(after) = filter.after_timestamp {
                if let Some(i) = events.iter().rposition(|e| e.timestamp < after) {
                    let _ = events.drain(..i);
                }
            }
        }

        session.events = events;
        Ok(session)
    }

    /// List one page of a user's sessions.
    ///
    /// `page_size` is clamped to `[1, 50]`. A malformed cursor is
    /// treated as no cursor. The next cursor is emitted iff the
    /// returned page is exactly `page_size` long.
    pub fn list(
        &self,
        app_name: &str,
        user_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ListPage> {
        let size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        let decoded = cursor.and_then(decode_page_cursor);
        let start_after = decoded.as_ref().map(|(ut, sid)| (*ut, sid.as_str()));

        let conn = self.conn()?;
        let rows = SessionRepo::list_page(&conn, app_name, user_id, i64::from(size), start_after)?;

        let next_cursor = if rows.len() == size as usize {
            rows.last().map(|last| encode_page_cursor(&last.id, last.update_time))
        } else {
            None
        };
        let sessions = rows.iter().map(row_to_session).collect();
        Ok(ListPage {
            sessions,
            next_cursor,
        })
    }

    /// Append an event to a session.
    ///
    /// Merges the event's non-`temp:` state delta into the in-memory
    /// session before persisting, then performs the two writes: event
    /// insert, session state + update time. Assigns the event an ID if
    /// it has none.
    pub fn append_event(&self, session: &mut Session, mut event: Event) -> Result<Event> {
        if event.id.is_empty() {
            event.id = new_id();
        }
        let now = epoch_now();

        // Collaborator contract: the merge happens before persistence.
        for (k, v) in &event.actions.state_delta {
            if !k.starts_with(TEMP_STATE_PREFIX) {
                let _ = session.state.insert(k.clone(), v.clone());
            }
        }

        let key = doc_key(&session.app_name, &session.user_id, &session.id);
        let conn = self.conn()?;

        // Write 1: the event document.
        EventRepo::insert(&conn, &event_to_row(session, &key, &event)?)?;

        // Write 2: merged state and update time on the session document.
        let state_json = serde_json::to_string(&strip_temp_keys(&session.state))?;
        let changed =
            SessionRepo::update_state(&conn, &key, &state_json, now, now + SESSION_TTL_SECS)?;
        if !changed {
            return Err(StoreError::InvalidOperation(format!(
                "append to missing session {key}"
            )));
        }

        session.last_update_time = now;
        session.events.push(event.clone());
        Ok(event)
    }

    /// Delete a session and its events. Idempotent on retry.
    pub fn delete(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()> {
        let key = doc_key(app_name, user_id, session_id);
        let conn = self.conn()?;
        let removed = EventRepo::delete_for_session(&conn, &key)?;
        let existed = SessionRepo::delete(&conn, &key)?;
        debug!(
            app_name,
            user_id, session_id, removed, existed, "session deleted"
        );
        Ok(())
    }

    /// Run pending schema migrations. Convenience for startup wiring.
    pub fn migrate(&self) -> Result<u32> {
        let conn = self.conn()?;
        crate::sqlite::migrations::run_migrations(&conn)
    }

    /// Currently applied schema version.
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.conn()?;
        crate::sqlite::migrations::current_version(&conn)
    }
}

/// Document key for the per-session document: `app_name:user_id:id`.
fn doc_key(app_name: &str, user_id: &str, session_id: &str) -> String {
    format!("{app_name}:{user_id}:{session_id}")
}

fn row_to_session(row: &SessionRow) -> Session {
    let state: StateMap = match serde_json::from_str(&row.state) {
        Ok(state) => state,
        Err(err) => {
            warn!(doc_key = %row.doc_key, %err, "corrupt session state; using empty map");
            StateMap::new()
        }
    };
    let mut session = Session::new(
        row.app_name.clone(),
        row.user_id.clone(),
        row.id.clone(),
        row.update_time,
    );
    session.state = state;
    session
}

fn row_to_event(row: &EventRow) -> Event {
    // Internal invariant violation: a row with no timestamp is shown
    // as "now" instead of failing the read.
    let timestamp = row.timestamp.unwrap_or_else(epoch_now);
    let mut event = Event::new(row.id.clone(), row.author.clone(), timestamp);
    event.invocation_id = row.invocation_id.clone();
    event.branch = row.branch.clone();
    event.content = decode_parts(row.content.as_deref());
    event.actions = decode_actions(row.actions.as_deref());
    event.long_running_tool_ids = row
        .long_running_tool_ids
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();
    event.partial = row.partial;
    event.turn_complete = row.turn_complete;
    event.error_code = row.error_code.clone();
    event.error_message = row.error_message.clone();
    event.interrupted = row.interrupted;
    event.grounding_metadata = row
        .grounding_metadata
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok());
    event
}

/// Decode stored content parts, skipping anything unrecognizable.
///
/// Forward compatibility: a part shape this build doesn't know must not
/// fail the read.
fn decode_parts(raw: Option<&str>) -> Vec<Part> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(raw) else {
        warn!("corrupt event content; treating as empty");
        return Vec::new();
    };
    values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Part>(value).ok())
        .collect()
}

fn event_to_row(session: &Session, session_key: &str, event: &Event) -> Result<EventRow> {
    let content = if event.content.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&event.content)?)
    };
    let actions = if event.actions.is_empty() {
        None
    } else {
        Some(encode_actions(&event.actions)?)
    };
    let long_running_tool_ids = if event.long_running_tool_ids.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&event.long_running_tool_ids)?)
    };
    let grounding_metadata = event
        .grounding_metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(EventRow {
        id: event.id.clone(),
        session_key: session_key.to_string(),
        app_name: session.app_name.clone(),
        user_id: session.user_id.clone(),
        session_id: session.id.clone(),
        invocation_id: event.invocation_id.clone(),
        author: event.author.clone(),
        branch: event.branch.clone(),
        timestamp: Some(event.timestamp),
        content,
        actions,
        long_running_tool_ids,
        partial: event.partial,
        turn_complete: event.turn_complete,
        error_code: event.error_code.clone(),
        error_message: event.error_message.clone(),
        interrupted: event.interrupted,
        grounding_metadata,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::connection::{self, ConnectionConfig};
    use crate::sqlite::migrations::run_migrations;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn setup() -> SessionStore {
        let pool = connection::new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            run_migrations(&conn).unwrap();
        }
        SessionStore::new(pool)
    }

    fn state(pairs: &[(&str, serde_json::Value)]) -> StateMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    /// Insert a session row with a controlled update time (listing tests
    /// need deterministic ordering).
    fn insert_at(store: &SessionStore, id: &str, update_time: f64) {
        let conn = store.conn().unwrap();
        SessionRepo::insert(
            &conn,
            &SessionRow {
                doc_key: doc_key("app", "u1", id),
                app_name: "app".into(),
                user_id: "u1".into(),
                id: id.into(),
                state: "{}".into(),
                create_time: update_time,
                update_time,
                ttl: update_time + SESSION_TTL_SECS,
            },
        )
        .unwrap();
    }

    // ── create / get ─────────────────────────────────────────────────

    #[test]
    fn create_assigns_id_when_absent() {
        let store = setup();
        let session = store.create("app", "u1", None, None).unwrap();
        assert_eq!(session.id.len(), 32);
        assert!(session.events.is_empty());
    }

    #[test]
    fn create_uses_given_id() {
        let store = setup();
        let session = store.create("app", "u1", None, Some("fixed")).unwrap();
        assert_eq!(session.id, "fixed");
    }

    #[test]
    fn create_returns_unstripped_state_but_persists_stripped() {
        let store = setup();
        let initial = state(&[("keep", json!(1)), ("temp:scratch", json!(2))]);
        let session = store
            .create("app", "u1", Some(initial), Some("s1"))
            .unwrap();

        // Caller sees the full state.
        assert!(session.state.contains_key("temp:scratch"));

        // Storage does not.
        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert!(loaded.state.contains_key("keep"));
        assert!(!loaded.state.contains_key("temp:scratch"));
    }

    #[test]
    fn get_after_create_has_identical_state_and_no_events() {
        let store = setup();
        let created = store
            .create("app", "u1", Some(state(&[("k", json!("v"))])), None)
            .unwrap();
        let loaded = store.get("app", "u1", &created.id, None).unwrap();
        assert_eq!(loaded.state, created.state);
        assert!(loaded.events.is_empty());
        assert_eq!(loaded.last_update_time, created.last_update_time);
    }

    #[test]
    fn get_auto_creates_missing_session() {
        let store = setup();
        let session = store.get("app", "u1", "never-created", None).unwrap();
        assert_eq!(session.id, "never-created");
        assert!(session.state.is_empty());
        assert!(session.events.is_empty());

        // And it is now persisted.
        let again = store.get("app", "u1", "never-created", None).unwrap();
        assert_eq!(again.id, "never-created");
    }

    // ── append_event ─────────────────────────────────────────────────

    fn text_event(id: &str, author: &str, text: &str, timestamp: f64) -> Event {
        let mut event = Event::new(id, author, timestamp);
        event.content.push(Part::Text { text: text.into() });
        event
    }

    #[test]
    fn append_persists_event_and_bumps_update_time() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let before = session.last_update_time;

        store
            .append_event(&mut session, text_event("e1", "planner", "hi", epoch_now()))
            .unwrap();
        assert!(session.last_update_time >= before);

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.events[0].id, "e1");
    }

    #[test]
    fn append_merges_state_delta_last_write_wins() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();

        let mut e1 = text_event("e1", "a", "x", epoch_now());
        e1.actions.state_delta = state(&[("k", json!(1)), ("other", json!("a"))]);
        store.append_event(&mut session, e1).unwrap();

        let mut e2 = text_event("e2", "a", "y", epoch_now());
        e2.actions.state_delta = state(&[("k", json!(2))]);
        store.append_event(&mut session, e2).unwrap();

        assert_eq!(session.state["k"], json!(2));
        assert_eq!(session.state["other"], json!("a"));

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert_eq!(loaded.state["k"], json!(2));
    }

    #[test]
    fn append_strips_temp_keys_from_persisted_state() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();

        let mut event = text_event("e1", "a", "x", epoch_now());
        event.actions.state_delta = state(&[("temp:scratch", json!(1)), ("kept", json!(2))]);
        store.append_event(&mut session, event).unwrap();

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert!(!loaded.state.contains_key("temp:scratch"));
        assert_eq!(loaded.state["kept"], json!(2));
    }

    #[test]
    fn append_update_time_is_monotone() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let mut last = session.last_update_time;
        for i in 0..5 {
            store
                .append_event(
                    &mut session,
                    text_event(&format!("e{i}"), "a", "x", epoch_now()),
                )
                .unwrap();
            assert!(session.last_update_time >= last);
            last = session.last_update_time;
        }
    }

    #[test]
    fn append_assigns_event_id_when_empty() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let appended = store
            .append_event(&mut session, text_event("", "a", "x", epoch_now()))
            .unwrap();
        assert_eq!(appended.id.len(), 32);
    }

    #[test]
    fn append_to_missing_session_is_invalid() {
        let store = setup();
        let mut session = Session::new("app", "u1", "ghost", 0.0);
        let err = store
            .append_event(&mut session, text_event("e1", "a", "x", 1.0))
            .unwrap_err();
        assert_matches!(err, StoreError::InvalidOperation(_));
    }

    #[test]
    fn append_roundtrips_actions_and_tool_ids() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();

        let mut event = text_event("e1", "a", "x", epoch_now());
        event.actions.transfer_to_agent = Some("analyst".into());
        event.actions.state_delta = state(&[("k", json!(1))]);
        event.long_running_tool_ids.insert("tool-9".into());
        store.append_event(&mut session, event).unwrap();

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        let back = &loaded.events[0];
        assert_eq!(back.actions.transfer_to_agent.as_deref(), Some("analyst"));
        assert!(back.long_running_tool_ids.contains("tool-9"));
    }

    // ── get filtering ────────────────────────────────────────────────

    /// Events appended after the session snapshot are invisible until a
    /// later append lands the update time.
    #[test]
    fn get_drops_events_newer_than_update_time() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        store
            .append_event(&mut session, text_event("e1", "a", "x", epoch_now()))
            .unwrap();

        // An event stamped in the future relative to the snapshot.
        store
            .append_event(
                &mut session,
                text_event("e2", "a", "y", epoch_now() + 3600.0),
            )
            .unwrap();

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        let ids: Vec<&str> = loaded.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e1"]);
    }

    #[test]
    fn get_num_recent_events_keeps_last_n() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let base = epoch_now();
        for i in 0..4 {
            store
                .append_event(
                    &mut session,
                    text_event(&format!("e{i}"), "a", "x", base - 10.0 + f64::from(i)),
                )
                .unwrap();
        }

        let filter = GetSessionFilter {
            num_recent_events: Some(2),
            after_timestamp: None,
        };
        let loaded = store.get("app", "u1", "s1", Some(&filter)).unwrap();
        let ids: Vec<&str> = loaded.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e2", "e3"]);
    }

    #[test]
    fn get_num_recent_takes_precedence_over_after_timestamp() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let base = epoch_now();
        for i in 0..4 {
            store
                .append_event(
                    &mut session,
                    text_event(&format!("e{i}"), "a", "x", base - 10.0 + f64::from(i)),
                )
                .unwrap();
        }

        let filter = GetSessionFilter {
            num_recent_events: Some(1),
            after_timestamp: Some(base - 10.0),
        };
        let loaded = store.get("app", "u1", "s1", Some(&filter)).unwrap();
        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.events[0].id, "e3");
    }

    #[test]
    fn get_after_timestamp_restricts_to_threshold() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        let base = epoch_now();
        for i in 0..4 {
            store
                .append_event(
                    &mut session,
                    text_event(&format!("e{i}"), "a", "x", base - 10.0 + f64::from(i)),
                )
                .unwrap();
        }

        // Threshold between e1 and e2: only events at or after it load.
        let filter = GetSessionFilter {
            num_recent_events: None,
            after_timestamp: Some(base - 8.5),
        };
        let loaded = store.get("app", "u1", "s1", Some(&filter)).unwrap();
        let ids: Vec<&str> = loaded.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e2", "e3"]);
    }

    // ── list / pagination ────────────────────────────────────────────

    #[test]
    fn list_paginates_with_cursor() {
        let store = setup();
        insert_at(&store, "s1", 100.0);
        insert_at(&store, "s2", 200.0);
        insert_at(&store, "s3", 300.0);

        let page1 = store.list("app", "u1", 2, None).unwrap();
        let ids: Vec<&str> = page1.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s3", "s2"]);
        let cursor = page1.next_cursor.unwrap();

        let page2 = store.list("app", "u1", 2, Some(&cursor)).unwrap();
        let ids: Vec<&str> = page2.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s1"]);
        assert!(page2.next_cursor.is_none());
    }

    #[test]
    fn list_pages_concatenate_to_full_scan() {
        let store = setup();
        // Tied update times exercise the id tie-break.
        insert_at(&store, "a", 100.0);
        insert_at(&store, "b", 100.0);
        insert_at(&store, "c", 200.0);
        insert_at(&store, "d", 300.0);
        insert_at(&store, "e", 100.0);

        let full = store.list("app", "u1", 50, None).unwrap();
        let expected: Vec<String> = full.sessions.iter().map(|s| s.id.clone()).collect();

        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = store.list("app", "u1", 2, cursor.as_deref()).unwrap();
            collected.extend(page.sessions.iter().map(|s| s.id.clone()));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(collected, expected);
        assert_eq!(expected, ["d", "c", "a", "b", "e"]);
    }

    #[test]
    fn list_full_final_page_emits_dead_end_cursor() {
        let store = setup();
        insert_at(&store, "s1", 100.0);
        insert_at(&store, "s2", 200.0);

        let page = store.list("app", "u1", 2, None).unwrap();
        assert_eq!(page.sessions.len(), 2);
        // Exactly page_size results: "maybe more" even though none remain.
        let cursor = page.next_cursor.unwrap();
        let empty = store.list("app", "u1", 2, Some(&cursor)).unwrap();
        assert!(empty.sessions.is_empty());
        assert!(empty.next_cursor.is_none());
    }

    #[test]
    fn list_clamps_page_size() {
        let store = setup();
        for i in 0..3 {
            insert_at(&store, &format!("s{i}"), f64::from(i));
        }
        // Zero is clamped up to one.
        let page = store.list("app", "u1", 0, None).unwrap();
        assert_eq!(page.sessions.len(), 1);
    }

    #[test]
    fn list_ignores_malformed_cursor() {
        let store = setup();
        insert_at(&store, "s1", 100.0);
        insert_at(&store, "s2", 200.0);

        let page = store.list("app", "u1", 10, Some("!!not-a-cursor!!")).unwrap();
        let ids: Vec<&str> = page.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s2", "s1"]);
    }

    #[test]
    fn list_returns_sessions_without_events() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        store
            .append_event(&mut session, text_event("e1", "a", "x", epoch_now()))
            .unwrap();

        let page = store.list("app", "u1", 10, None).unwrap();
        assert_eq!(page.sessions.len(), 1);
        assert!(page.sessions[0].events.is_empty());
    }

    // ── delete ───────────────────────────────────────────────────────

    #[test]
    fn delete_removes_session_and_events() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        store
            .append_event(&mut session, text_event("e1", "a", "x", epoch_now()))
            .unwrap();

        store.delete("app", "u1", "s1").unwrap();

        // get() now auto-creates a fresh, empty session.
        let fresh = store.get("app", "u1", "s1", None).unwrap();
        assert!(fresh.events.is_empty());
        assert!(fresh.state.is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = setup();
        store.delete("app", "u1", "never-existed").unwrap();
        store.delete("app", "u1", "never-existed").unwrap();
    }

    // ── defensive decoding ───────────────────────────────────────────

    #[test]
    fn unknown_part_shapes_are_skipped_on_read() {
        let store = setup();
        let mut session = store.create("app", "u1", None, Some("s1")).unwrap();
        store
            .append_event(&mut session, text_event("e1", "a", "hello", epoch_now()))
            .unwrap();

        // Corrupt the stored content with an unknown part shape.
        {
            let conn = store.conn().unwrap();
            conn.execute(
                "UPDATE events SET content = ?1 WHERE id = 'e1'",
                [r#"[{"type":"hologram","frames":3},{"type":"text","text":"hello"}]"#],
            )
            .unwrap();
        }

        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert_eq!(loaded.events[0].content.len(), 1);
        assert_eq!(
            loaded.events[0].content[0],
            Part::Text {
                text: "hello".into()
            }
        );
    }

    #[test]
    fn corrupt_state_reads_as_empty() {
        let store = setup();
        let _ = store.create("app", "u1", None, Some("s1")).unwrap();
        {
            let conn = store.conn().unwrap();
            conn.execute(
                "UPDATE sessions SET state = 'not json' WHERE id = 's1'",
                [],
            )
            .unwrap();
        }
        let loaded = store.get("app", "u1", "s1", None).unwrap();
        assert!(loaded.state.is_empty());
    }
}
