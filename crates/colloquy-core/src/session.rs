//! Session type: identity, state, and the ordered event log.

use serde::{Deserialize, Serialize};

use crate::{Event, StateMap};

/// Prefix marking state keys that are never persisted.
pub const TEMP_STATE_PREFIX: &str = "temp:";

/// A multi-turn agent conversation.
///
/// Identity is the triple `(app_name, user_id, id)`. `events` is ordered
/// by timestamp ascending and only populated on a full read; listing
/// returns sessions with empty logs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Application the session belongs to.
    pub app_name: String,
    /// Owning user.
    pub user_id: String,
    /// Session ID.
    pub id: String,
    /// Current state map. In-memory it may contain `temp:` keys; those
    /// are stripped before every persisted write.
    #[serde(default)]
    pub state: StateMap,
    /// Ordered event log (timestamp ascending).
    #[serde(default)]
    pub events: Vec<Event>,
    /// Seconds since epoch of the last successful write. Monotonically
    /// non-decreasing; bumped exactly once per event append.
    pub last_update_time: f64,
}

impl Session {
    /// Build a session with empty state and no events.
    #[must_use]
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        id: impl Into<String>,
        last_update_time: f64,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            id: id.into(),
            state: StateMap::new(),
            events: Vec::new(),
            last_update_time,
        }
    }
}

/// Filters applied when reading a session's event log.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetSessionFilter {
    /// Keep only the last N events. Takes precedence over
    /// `after_timestamp` post-filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_recent_events: Option<usize>,
    /// Restrict to events at or after this epoch timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_timestamp: Option<f64>,
}

/// Copy of `state` with every `temp:`-prefixed key removed.
///
/// Applied before each persisted write; the in-memory session keeps the
/// unstripped map.
#[must_use]
pub fn strip_temp_keys(state: &StateMap) -> StateMap {
    state
        .iter()
        .filter(|(k, _)| !k.starts_with(TEMP_STATE_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
