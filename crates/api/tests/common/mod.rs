#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use projectdeck_api::config::{LogFormat, ServerConfig};
use projectdeck_api::router::build_app_router;
use projectdeck_api::state::AppState;
use projectdeck_core::error::{CoreError, CoreResult};
use projectdeck_core::project::{NewProject, ProjectChanges};
use projectdeck_core::types::DbId;
use projectdeck_db::config::{DatabaseConfig, RunMode};
use projectdeck_db::connection::{ConnectionManager, Connector};
use projectdeck_db::models::project::Project;
use projectdeck_db::store::{InMemoryProjectStore, ProjectStore};
use projectdeck_db::DbPool;

/// Nothing listens on port 1; the lazy pool never dials it.
const TEST_DATABASE_URL: &str = "postgres://127.0.0.1:1/projectdeck_test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(run_mode: RunMode) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        run_mode,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        static_dir: "public".to_string(),
        expose_error_detail: !run_mode.is_production(),
        log_format: LogFormat::Pretty,
        database: DatabaseConfig {
            url: TEST_DATABASE_URL.to_string(),
            liveness_interval: Duration::from_secs(3600),
            run_mode,
            ..Default::default()
        },
    }
}

/// Succeeds with a pool that never opens a socket.
pub struct LazyConnector;

#[async_trait]
impl Connector for LazyConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
        PgPoolOptions::new().connect_lazy(&config.url)
    }
}

/// Fails every connect.
pub struct RefusingConnector;

#[async_trait]
impl Connector for RefusingConnector {
    async fn connect(&self, _config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

/// Counts every call and fails it. Used to prove the gate keeps requests
/// away from the store.
#[derive(Default)]
pub struct CountingStore {
    calls: AtomicU32,
}

impl CountingStore {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> CoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CoreError::Internal("counting store is not a real store".to_string())
    }
}

#[async_trait]
impl ProjectStore for CountingStore {
    async fn create(&self, _input: NewProject) -> CoreResult<Project> {
        Err(self.record())
    }

    async fn list(&self) -> CoreResult<Vec<Project>> {
        Err(self.record())
    }

    async fn find_by_id(&self, _id: DbId) -> CoreResult<Project> {
        Err(self.record())
    }

    async fn update(&self, _id: DbId, _changes: ProjectChanges) -> CoreResult<Project> {
        Err(self.record())
    }

    async fn delete(&self, _id: DbId) -> CoreResult<DbId> {
        Err(self.record())
    }
}

/// A manager that reports `connected` without any database behind it.
pub async fn connected_manager(config: &ServerConfig) -> ConnectionManager {
    let manager = ConnectionManager::new(config.database.clone(), Arc::new(LazyConnector));
    manager.connect().await;
    assert!(manager.is_connected());
    manager
}

/// A manager whose only connect attempt failed.
pub async fn disconnected_manager(config: &ServerConfig) -> ConnectionManager {
    let manager = ConnectionManager::new(config.database.clone(), Arc::new(RefusingConnector));
    manager.connect().await;
    assert!(!manager.is_connected());
    manager
}

/// Build the full application router around the given manager and store.
///
/// Goes through [`build_app_router`], so tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery, error detail)
/// that production uses.
pub fn build_app(
    config: ServerConfig,
    connections: ConnectionManager,
    projects: Arc<dyn ProjectStore>,
) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        connections,
        projects,
        started_at: Instant::now(),
    };
    build_app_router(state, &config)
}

/// Connected app backed by a fresh in-memory store.
pub async fn build_test_app() -> Router {
    build_test_app_with(RunMode::Test).await
}

pub async fn build_test_app_with(run_mode: RunMode) -> Router {
    let config = test_config(run_mode);
    let connections = connected_manager(&config).await;
    build_app(config, connections, Arc::new(InMemoryProjectStore::new()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(json)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
