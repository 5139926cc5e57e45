//! Session facade: storage → classification → protocol encoding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use colloquy_core::{Session, StateMap};
use colloquy_protocol::{classify_session, encode_events, to_external_json};
use colloquy_store::SessionStore;

use crate::errors::{Result, ServerError};

fn default_page_size() -> u32 {
    10
}

/// Listing request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsRequest {
    /// Page size, `(0, 50]`, default 10.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Opaque cursor from a previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl ListSessionsRequest {
    /// Validate the request before it reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > 50 {
            return Err(ServerError::BadRequest(format!(
                "pageSize must be in (0, 50], got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}

/// One listed session, event log omitted.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    /// Session ID.
    pub id: String,
    /// Owning application.
    pub app_name: String,
    /// Owning user.
    pub user_id: String,
    /// Current state map.
    pub state: StateMap,
    /// Seconds since epoch of the last write.
    pub last_update_time: f64,
}

impl From<Session> for SessionSummary {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            app_name: session.app_name,
            user_id: session.user_id,
            state: session.state,
            last_update_time: session.last_update_time,
        }
    }
}

/// Listing response body.
#[derive(Debug, Serialize)]
pub struct ListSessionsResponse {
    /// Sessions, most recently updated first.
    pub sessions: Vec<SessionSummary>,
    /// Cursor for the next page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Full single-session response: identity, state, and the event log
/// translated into protocol events.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Session ID.
    pub id: String,
    /// Owning application.
    pub app_name: String,
    /// Owning user.
    pub user_id: String,
    /// Current state map.
    pub state: StateMap,
    /// Protocol events, flattened to plain JSON.
    pub events: Vec<Value>,
    /// Seconds since epoch of the last write.
    pub last_update_time: f64,
}

/// Orchestrates the read path over the store and the protocol pipeline.
pub struct SessionFacade {
    store: Arc<SessionStore>,
    app_name: String,
    completion_key: String,
}

impl SessionFacade {
    /// Create a facade over the given store.
    pub fn new(store: Arc<SessionStore>, app_name: &str, completion_key: &str) -> Self {
        Self {
            store,
            app_name: app_name.to_string(),
            completion_key: completion_key.to_string(),
        }
    }

    /// The store behind the facade.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// List one page of the user's sessions.
    pub fn list_sessions(
        &self,
        request: &ListSessionsRequest,
        user_id: &str,
    ) -> Result<ListSessionsResponse> {
        request.validate()?;
        let page = self.store.list(
            &self.app_name,
            user_id,
            request.page_size,
            request.cursor.as_deref(),
        )?;
        Ok(ListSessionsResponse {
            sessions: page.sessions.into_iter().map(Into::into).collect(),
            cursor: page.next_cursor,
        })
    }

    /// Load a session and translate its event log into protocol events.
    pub fn get_session(&self, session_id: &str, user_id: &str) -> Result<SessionView> {
        let session = self.store.get(&self.app_name, user_id, session_id, None)?;

        let stream = classify_session(&session, &self.completion_key);
        let protocol_events = encode_events(&stream, session_id, None);
        let events = to_external_json(&protocol_events);

        Ok(SessionView {
            id: session.id,
            app_name: session.app_name,
            user_id: session.user_id,
            state: session.state,
            events,
            last_update_time: session.last_update_time,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
