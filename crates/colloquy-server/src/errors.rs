//! Server error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use colloquy_store::StoreError;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, malformed, or rejected credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Pool exhaustion and database errors are retryable.
            Self::Store(StoreError::Pool(_) | StoreError::Sqlite(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
