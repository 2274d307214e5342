//! Demo service for the structured logger.
//!
//! Loads `logger.toml` (or the path given as the first argument), wires the
//! console and rotating-file transports, installs the exception sink and
//! serves a small axum app behind the access-log middleware.
//!
//! ```text
//! GET  /health  → 200 "ok"
//! POST /echo    → echoes the JSON body
//! GET  /fail    → 500 (logged at error)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_logger::backend::ExceptionSink;
use service_logger::config::{apply_reload, load_config, ConfigWatcher};
use service_logger::{Level, Logger, LoggerConfig, TransportBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics from the logger itself go through tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "service_logger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logger.toml"));

    let config = if config_path.exists() {
        load_config(&config_path)?
    } else {
        tracing::warn!(path = ?config_path, "Config file not found, using defaults");
        LoggerConfig::default()
    };

    let backend = TransportBackend::from_config(&config)?;
    let logger = Arc::new(Logger::from_config(&config, backend)?);

    if config.files.enabled {
        ExceptionSink::new(Path::new(&config.files.directory).join(&config.files.exceptions_file)).install();
    }

    // Keep the watcher alive for the lifetime of the server
    let _watcher = if config_path.exists() {
        let (watcher, mut updates) = ConfigWatcher::new(&config_path);
        let reload_logger = logger.clone();
        tokio::spawn(async move {
            while let Some(new_config) = updates.recv().await {
                apply_reload(&reload_logger, &new_config);
            }
        });
        Some(watcher.run()?)
    } else {
        None
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
        .route("/fail", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "failed") }))
        .layer(logger.middleware().with_max_body_bytes(config.http.max_body_bytes));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let local_addr = listener.local_addr()?;

    logger.log(
        Level::Info,
        "Service started",
        Some(json!({ "service": "service-logger", "address": local_addr.to_string() })),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    logger.log(Level::Info, "Service stopped", None);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
