//! # colloquyd
//!
//! Colloquy server binary: loads settings, opens the database, runs
//! migrations, and serves the HTTP API.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use colloquy_server::{build_router, AppState, SessionFacade};
use colloquy_settings::Settings;
use colloquy_store::{new_file, run_migrations, ConnectionConfig, SessionStore};

/// Colloquy session server.
#[derive(Parser, Debug)]
#[command(name = "colloquyd", about = "Colloquy session server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Path to the settings file (default: `~/.colloquy/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = cli
        .settings
        .clone()
        .unwrap_or_else(colloquy_settings::settings_path);
    colloquy_settings::load_settings_from_path(&path)
        .with_context(|| format!("Invalid settings at {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Settings problems are fatal at startup, never papered over.
    let mut settings = load_settings(&args)?;
    if let Some(host) = args.host.clone() {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.database.path));
    ensure_parent_dir(&db_path)?;

    let pool = new_file(
        &db_path.to_string_lossy(),
        &ConnectionConfig {
            pool_size: settings.database.pool_size,
            busy_timeout_ms: settings.database.busy_timeout_ms,
        },
    )
    .context("Failed to open database")?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let version = run_migrations(&conn).context("Failed to run migrations")?;
        tracing::info!(schema_version = version, db_path = %db_path.display(), "database ready");
    }

    let store = Arc::new(SessionStore::new(pool));
    let facade = Arc::new(SessionFacade::new(
        store,
        &settings.service.app_name,
        &settings.protocol.completion_key,
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        facade,
        settings: Arc::new(settings),
        start_time: Instant::now(),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!("colloquyd listening on http://{local}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await
        .context("Server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
