//! Health, version, route docs and the `/api` fallback.

use axum::extract::{OriginalUri, State};
use axum::Json;
use projectdeck_core::types::Timestamp;
use projectdeck_db::connection::ConnectionStatus;
use projectdeck_db::models::stats::StatsReport;
use serde::Serialize;

use crate::error::AppError;
use crate::memory::{self, MemoryUsage};
use crate::response::ApiResponse;
use crate::routes::{RouteDoc, ROUTE_DOCS};
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `OK` when the database answers a ping, `DEGRADED` otherwise.
    pub status: &'static str,
    pub timestamp: Timestamp,
    /// Seconds since the process started.
    pub uptime: f64,
    pub environment: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub memory: MemoryUsage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: ConnectionStatus,
    pub healthy: bool,
    pub stats: StatsReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub build_profile: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocs {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: &'static [RouteDoc],
}

/// GET /health -- service, database and memory health. Always 200.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = state.connections.is_healthy().await;
    let stats = state.connections.stats().await;

    Json(HealthResponse {
        status: if healthy { "OK" } else { "DEGRADED" },
        timestamp: chrono::Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.run_mode.as_str(),
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            status: state.connections.status(),
            healthy,
            stats,
        },
        memory: memory::current(),
    })
}

/// GET /api/version
pub async fn version(State(state): State<AppState>) -> Json<ApiResponse<VersionInfo>> {
    let build_profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };

    Json(ApiResponse::data(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.run_mode.as_str(),
        build_profile,
    }))
}

/// GET /api/docs
pub async fn docs() -> Json<ApiResponse<ApiDocs>> {
    Json(ApiResponse::data(ApiDocs {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: ROUTE_DOCS,
    }))
}

/// Fallback for unmatched `/api/*` paths.
pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}
