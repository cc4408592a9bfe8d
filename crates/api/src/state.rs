use std::sync::Arc;
use std::time::Instant;

use projectdeck_db::connection::ConnectionManager;
use projectdeck_db::store::ProjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database connection lifecycle, read by the connection gate and `/health`.
    pub connections: ConnectionManager,
    /// Project persistence.
    pub projects: Arc<dyn ProjectStore>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}
