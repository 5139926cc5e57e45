//! `SQLite` backend for the session document store.
//!
//! Sessions are one row per document keyed `app_name:user_id:id`;
//! events live in a per-session sub-collection table ordered by
//! timestamp. The layout mirrors a per-key document store with ordered
//! sub-collections.
//!
//! # Architecture
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode and
//!   performance pragmas applied to every connection.
//! - **[`migrations`]**: Version-tracked schema evolution. Migrations
//!   are embedded at compile time and run transactionally.
//! - **[`row_types`]**: Raw database row structs for `rusqlite` mapping.
//! - **[`repositories`]**: Stateless repository structs; each method
//!   takes `&Connection` and executes SQL. No shared mutable state.

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod row_types;

pub use connection::{new_file, new_in_memory, ConnectionConfig, ConnectionPool, PooledConnection};
pub use migrations::{current_version, latest_version, run_migrations};
