//! AgriRent notification server.
//!
//! Wires the document store, claim store, push relay, HTTP API and
//! the booking change-feed worker together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use agrirent_core::config::AppConfig;
use agrirent_core::config::logging::LogFormat;
use agrirent_core::error::AppError;
use agrirent_push::{ExpoPushClient, PushRelay};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `AGRIRENT_ENV` overlay and environment
/// variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AGRIRENT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting AgriRent notification server");

    // ── Step 1: Document store ───────────────────────────────────
    tracing::info!(provider = ?config.database.provider, "Connecting document store");
    let store = agrirent_database::connect_store(&config.database).await?;

    // ── Step 2: Notification claims ──────────────────────────────
    let claims = agrirent_cache::connect_claim_store(&config.cache).await?;

    // ── Step 3: Push relay ───────────────────────────────────────
    let relay: Arc<dyn PushRelay> = Arc::new(ExpoPushClient::new(&config.push)?);
    if !config.push.enabled {
        tracing::warn!("Push delivery disabled; notifications are stored only");
    }

    // ── Step 4: Services ─────────────────────────────────────────
    if config.trigger.webhook_secret.is_none() {
        tracing::warn!("No trigger.webhook_secret set; the booking trigger endpoint is open");
    }
    let state = agrirent_api::AppState::build(
        config.clone(),
        Arc::clone(&store),
        claims,
        relay,
    )?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Change-feed worker ───────────────────────────────
    let worker_handle = if config.trigger.change_feed {
        let worker = agrirent_worker::ChangeFeedWorker::new(
            Arc::clone(&store),
            Arc::clone(&state.trigger),
            &config.trigger,
        );
        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = worker.run(worker_cancel).await {
                tracing::error!(error = %e, "Change-feed worker failed; relying on the trigger webhook");
            }
        });
        tracing::info!("Change-feed worker started");
        Some(handle)
    } else {
        tracing::info!("Change-feed worker disabled; relying on the trigger webhook");
        None
    };

    // ── Step 6: HTTP server ──────────────────────────────────────
    let app = agrirent_api::build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "AgriRent server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Drain background work ────────────────────────────
    if let Some(handle) = worker_handle {
        tracing::info!("Waiting for the change-feed worker to finish...");
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Change-feed worker did not stop within the grace period");
        }
    }

    tracing::info!("AgriRent server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
