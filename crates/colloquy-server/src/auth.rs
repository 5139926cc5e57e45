//! Bearer-token authentication.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use colloquy_settings::AuthSettings;

use crate::errors::ServerError;

/// User identity for requests with no auth configured.
const ANONYMOUS_USER: &str = "anonymous";

/// The caller's resolved identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier (the token's subject).
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Resolve the caller's identity from request headers.
///
/// With a JWT secret configured, requires an `Authorization: Bearer`
/// HS256 token and takes the user from its `sub` claim. Without one
/// (local development), the `x-user-id` header is trusted, defaulting
/// to `"anonymous"`.
pub fn authenticate(
    headers: &HeaderMap,
    auth: &AuthSettings,
) -> Result<AuthenticatedUser, ServerError> {
    let Some(secret) = &auth.jwt_secret else {
        let user_id = headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(ANONYMOUS_USER)
            .to_string();
        return Ok(AuthenticatedUser { user_id });
    };

    let token = bearer_token(headers)
        .ok_or_else(|| ServerError::Unauthorized("missing bearer token".into()))?;

    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
        .map_err(|err| ServerError::Unauthorized(format!("invalid token: {err}")))?;

    Ok(AuthenticatedUser {
        user_id: data.claims.sub,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
