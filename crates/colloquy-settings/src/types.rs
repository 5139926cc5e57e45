//! Settings type definitions with compiled defaults.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Top-level settings for the Colloquy service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service identity and agent parameters.
    pub service: ServiceSettings,
    /// Event-to-protocol translation parameters.
    pub protocol: ProtocolSettings,
    /// SQLite database settings.
    pub database: DatabaseSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Authentication settings.
    pub auth: AuthSettings,
}

/// Service identity and agent parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Application name, the first component of every session document key.
    pub app_name: String,
    /// Model identifier handed to the agent runtime.
    pub model: String,
    /// Prompt used when compacting long conversations.
    pub compaction_prompt: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            app_name: "colloquy".into(),
            model: "gemini-2.5-flash".into(),
            compaction_prompt: "Summarize the conversation so far, preserving decisions, \
                                open questions, and any values the user provided."
                .into(),
        }
    }
}

/// Event-to-protocol translation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSettings {
    /// State-delta key whose presence marks an event as the session's
    /// terminating response. The last event carrying it wins.
    pub completion_key: String,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            completion_key: "final_response".into(),
        }
    }
}

/// SQLite database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the database file.
    pub path: String,
    /// Maximum connection pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "colloquy.db".into(),
            pool_size: 16,
            busy_timeout_ms: 30_000,
        }
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8632,
        }
    }
}

/// Authentication settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret for verifying bearer tokens. Requests are rejected
    /// when unset.
    pub jwt_secret: Option<String>,
}

impl Settings {
    /// Validate required values. Called once at startup; failure is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.service.app_name.is_empty() {
            return Err(SettingsError::InvalidValue(
                "service.app_name must not be empty".into(),
            ));
        }
        if self.database.path.is_empty() {
            return Err(SettingsError::InvalidValue(
                "database.path must not be empty".into(),
            ));
        }
        if self.database.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "database.pool_size must be at least 1".into(),
            ));
        }
        if self.protocol.completion_key.is_empty() {
            return Err(SettingsError::InvalidValue(
                "protocol.completion_key must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Copy with secrets blanked, safe to expose on `/config`.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.jwt_secret.is_some() {
            copy.auth.jwt_secret = Some("<redacted>".into());
        }
        copy
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
