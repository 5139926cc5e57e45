//! # colloquy-core
//!
//! Domain vocabulary for the Colloquy session service.
//!
//! This crate provides the types every other Colloquy crate depends on:
//!
//! - **[`Session`]**: identity, state map, ordered event log, update time
//! - **[`Event`]**: immutable log entry with [`Part`] content and [`EventActions`]
//! - **[`Part`]**: tagged content union of text, function call, function response
//! - **[`GetSessionFilter`]**: event-window filters for session reads
//! - **ID/time helpers**: [`new_id`] (uuid4 hex) and [`epoch_now`]
//!
//! No I/O happens here; persistence and protocol translation live in
//! `colloquy-store` and `colloquy-protocol`.

#![deny(unsafe_code)]

pub mod event;
pub mod ids;
pub mod session;

pub use event::{Event, EventActions, Part};
pub use ids::{epoch_now, new_id};
pub use session::{strip_temp_keys, GetSessionFilter, Session, TEMP_STATE_PREFIX};

/// JSON object map alias used for session state and state deltas.
pub type StateMap = serde_json::Map<String, serde_json::Value>;
