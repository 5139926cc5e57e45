//! Translation of stored session event logs into the external task
//! protocol.
//!
//! Two stages, both pure and per-request (nothing here is cached or
//! shared):
//!
//! 1. [`classify_session`] turns a session's raw events into an ordered
//!    stream of [`StreamingEvent`]s and detects which one is the
//!    session's final response.
//! 2. [`encode_events`] turns that stream into sequenced, timestamp
//!    ordered [`ProtocolEvent`] status updates, synthesizing a terminal
//!    "completed" event that carries the final session state.

pub mod encoder;
pub mod serialize;
pub mod streaming;
pub mod task;

pub use encoder::encode_events;
pub use serialize::to_external_json;
pub use streaming::{classify_session, StreamingEvent, StreamingEventKind};
pub use task::{MessagePart, ProtocolEvent, ProtocolMessage, Role, TaskState, TaskStatus};
