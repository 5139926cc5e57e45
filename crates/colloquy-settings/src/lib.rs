//! # colloquy-settings
//!
//! Configuration for the Colloquy session service, loaded from three
//! layers (in priority order):
//!
//! 1. **Compiled defaults**: [`Settings::default()`]
//! 2. **Settings file**: JSON, deep-merged over defaults
//! 3. **Environment variables**: `COLLOQUY_*` overrides (highest priority)
//!
//! There is no hidden global: `main` loads a [`Settings`] once and hands
//! it to every component that needs it. A malformed settings file or a
//! failed validation is fatal at startup.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings_from_path, settings_path};
pub use types::{
    AuthSettings, DatabaseSettings, ProtocolSettings, ServerSettings, ServiceSettings, Settings,
};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
