use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use projectdeck_api::config::{LogFormat, ServerConfig};
use projectdeck_api::router::build_app_router;
use projectdeck_api::state::AppState;
use projectdeck_db::connection::ConnectionManager;
use projectdeck_db::store::PgProjectStore;

#[tokio::main]
async fn main() {
    let started_at = Instant::now();
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "projectdeck_api=debug,projectdeck_db=debug,tower_http=debug".into()
            }),
        )
        .with(fmt_layer)
        .init();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = config.run_mode.as_str(),
        "Loaded server configuration",
    );

    // --- Database ---
    let connections = ConnectionManager::postgres(config.database.clone());
    connections.start();
    connections.connect().await;

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        connections: connections.clone(),
        projects: Arc::new(PgProjectStore::new(connections.clone())),
        started_at,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(connections.clone()))
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    connections.shutdown().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Also resolves when a
/// connection background task has died, since the process can no longer
/// detect or recover from a lost database.
async fn shutdown_signal(connections: ConnectionManager) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
        () = connections.background_failure() => {
            tracing::error!("Connection background task failed, starting graceful shutdown");
        }
    }
}
