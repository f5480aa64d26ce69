//! Harmonic Session - demo client
//!
//! Connects the session layer to a live realtime endpoint: builds the cache
//! and sweep task, starts the reconnecting socket client, and logs inbound
//! events until Ctrl+C / SIGTERM.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harmonic_session::cache::TtlCache;
use harmonic_session::socket::{SocketClient, WsConnector};
use harmonic_session::{spawn_sweep_task, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber with env filter.
    // Defaults to "info" level, can be overridden with RUST_LOG env var.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harmonic_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Harmonic Session client");

    let config = Config::from_env();
    info!(
        url = %config.socket_url,
        max_reconnect_attempts = config.max_reconnect_attempts,
        reconnect_delay_ms = config.reconnect_delay_ms,
        sweep_interval = config.sweep_interval,
        "configuration loaded"
    );

    // Response cache plus its background sweeper.
    let cache: Arc<RwLock<TtlCache<serde_json::Value>>> =
        Arc::new(RwLock::new(TtlCache::new()));
    let sweep_handle = spawn_sweep_task(Arc::clone(&cache), config.sweep_interval);

    // Reconnecting socket client over a real WebSocket.
    let client = SocketClient::new(config.socket_config(), Arc::new(WsConnector));

    let _physics_sub = client.on("physics_update", |payload| {
        info!(%payload, "physics update");
    });
    let _cursor_sub = client.on("cursor_moved", |payload| {
        info!(%payload, "collaborator cursor");
    });

    client.connect();
    client.emit("hello", json!({ "client": "harmonic-session" }));

    shutdown_signal().await;

    info!("shutting down");
    client.disconnect();
    sweep_handle.abort();

    if client.gave_up() {
        warn!("session ended in terminal failure; endpoint was unreachable");
    }

    info!("shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("received SIGTERM, initiating shutdown");
        }
    }
}
