//! # colloquy-store
//!
//! SQLite-backed document store for agent sessions and their event logs.
//!
//! - **[`SessionStore`]**: create / get / list / append / delete with
//!   deterministic ordering and keyset pagination
//! - **Page cursors**: opaque base64url tokens over
//!   `(last_update_time, last_session_id)`; malformed tokens decode to
//!   "no cursor", never an error
//! - **Actions codec**: versioned binary encoding of the per-event
//!   actions payload, decoded defensively
//! - **`SQLite` backend**: `r2d2` pool with WAL pragmas, version-tracked
//!   migrations, stateless repositories over `&Connection`

#![deny(unsafe_code)]

pub mod actions;
pub mod cursor;
pub mod errors;
pub mod sqlite;
pub mod store;

pub use actions::{decode_actions, encode_actions};
pub use cursor::{decode_page_cursor, encode_page_cursor};
pub use errors::{Result, StoreError};
pub use sqlite::connection::{new_file, new_in_memory, ConnectionConfig, ConnectionPool};
pub use sqlite::migrations::run_migrations;
pub use store::{ListPage, SessionStore};
