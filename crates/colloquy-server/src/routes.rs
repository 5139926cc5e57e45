//! Axum router and request handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use colloquy_settings::Settings;

use crate::auth::authenticate;
use crate::errors::ServerError;
use crate::facade::{ListSessionsRequest, ListSessionsResponse, SessionFacade, SessionView};

/// Shared state accessible from handlers.
#[derive(Clone)]
pub struct AppState {
    /// The session facade.
    pub facade: Arc<SessionFacade>,
    /// Active configuration.
    pub settings: Arc<Settings>,
    /// When the server started.
    pub start_time: Instant,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/sessions/list", post(list_sessions_handler))
        .route("/v1/sessions/{id}", get(get_session_handler))
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /v1/sessions/list
async fn list_sessions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ListSessionsRequest>,
) -> Result<Json<ListSessionsResponse>, ServerError> {
    let user = authenticate(&headers, &state.settings.auth)?;
    tracing::debug!(user_id = %user.user_id, page_size = request.page_size, "listing sessions");
    let response = state.facade.list_sessions(&request, &user.user_id)?;
    Ok(Json(response))
}

/// GET /v1/sessions/{id}
async fn get_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let user = authenticate(&headers, &state.settings.auth)?;
    tracing::debug!(user_id = %user.user_id, %session_id, "loading session");
    let view = state.facade.get_session(&session_id, &user.user_id)?;
    Ok(Json(view))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let schema_version = state.facade.store().schema_version().unwrap_or(0);
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "schema_version": schema_version,
    }))
}

/// GET /config: the active configuration with secrets redacted.
async fn config_handler(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.redacted())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
