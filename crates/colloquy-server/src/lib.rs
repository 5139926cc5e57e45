//! Colloquy HTTP server.
//!
//! The read surface over the session store: listing and single-session
//! endpoints behind bearer-token auth, plus health and config probes.
//! [`facade::SessionFacade`] glues storage, classification, and protocol
//! encoding into per-request responses; [`routes`] exposes it over axum.

pub mod auth;
pub mod errors;
pub mod facade;
pub mod routes;

pub use errors::{Result, ServerError};
pub use facade::SessionFacade;
pub use routes::{build_router, AppState};
