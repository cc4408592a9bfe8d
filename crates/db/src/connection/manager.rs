//! Database connection manager.
//!
//! [`ConnectionManager`] is created once at startup and cloned into the HTTP
//! state. It connects through a [`Connector`], records the outcome in a
//! [`ConnectionState`] published over a `watch` channel, and reacts to
//! [`ConnectionEvent`]s on a dedicated listener task:
//!
//! ```text
//! disconnected -> connecting -> connected | error
//! connected -> disconnected (lost) -> [retry after delay] -> connecting
//! any -> disconnecting -> disconnected (shutdown)
//! ```
//!
//! At most one retry is pending at a time, and retries stop for good once
//! the [`ReconnectPolicy`](super::ReconnectPolicy) budget is spent. If a
//! background task panics, [`ConnectionManager::background_failure`]
//! resolves so the process can shut down instead of running unsupervised.

use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use projectdeck_core::error::CoreError;
use sqlx::postgres::PgConnectOptions;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::config::DatabaseConfig;
use crate::connection::events::ConnectionEvent;
use crate::connection::state::{ConnectionPhase, ConnectionState, ConnectionStatus};
use crate::error::is_connection_error;
use crate::models::stats::StatsReport;
use crate::DbPool;

/// How long shutdown waits for each background task to exit.
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a ready-to-use pool for the configured database.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, config: &DatabaseConfig) -> Result<DbPool, sqlx::Error>;
}

/// Production connector: builds the pool, pings it and applies migrations.
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
        let pool = crate::create_pool(config).await?;
        crate::health_check(&pool).await?;
        crate::run_migrations(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        Ok(pool)
    }
}

/// Owns the lifecycle of the single logical database connection.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: DatabaseConfig,
    connector: Arc<dyn Connector>,
    state: watch::Sender<ConnectionState>,
    pool: RwLock<Option<DbPool>>,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
    /// Taken by the listener task when it starts.
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<ConnectionEvent>>>,
    retry_pending: AtomicBool,
    cancel: CancellationToken,
    /// Tripped when a background task dies by panicking.
    fault: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}


impl ConnectionManager {
    pub fn new(config: DatabaseConfig, connector: Arc<dyn Connector>) -> Self {
        let (state, _) = watch::channel(ConnectionState::default());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            inner: Arc::new(Inner {
                config,
                connector,
                state,
                pool: RwLock::new(None),
                events_tx,
                events_rx: Mutex::new(Some(events_rx)),
                retry_pending: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                fault: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A manager that connects with [`PgConnector`].
    pub fn postgres(config: DatabaseConfig) -> Self {
        Self::new(config, Arc::new(PgConnector))
    }

    /// Snapshot of the current connection state. Pure read.
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::from(&*self.inner.state.borrow())
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.inner.state.borrow().phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase() == ConnectionPhase::Connected
    }

    /// Resolves once the event listener or liveness watcher has panicked.
    /// Never resolves otherwise.
    pub async fn background_failure(&self) {
        self.inner.fault.cancelled().await;
    }

    /// Attempt to establish the connection.
    ///
    /// Never fails: the outcome is recorded in the connection state. After
    /// a failure, production mode schedules a retry; other modes log and
    /// carry on with the data routes gated off.
    pub async fn connect(&self) {
        self.attempt_connect(false).await;
    }

    /// Close the pool if open and move to `disconnected`. Idempotent.
    pub async fn disconnect(&self) {
        self.update(|s| s.phase = ConnectionPhase::Disconnecting);

        let pool = self.inner.pool.write().await.take();
        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("Database connection closed");
        }

        self.update(|s| s.phase = ConnectionPhase::Disconnected);
    }

    /// Schedule one deferred reconnection attempt.
    ///
    /// Increments the attempt counter and, unless the budget is exhausted,
    /// arranges for a [`ConnectionEvent::RetryDue`] after the fixed delay.
    /// Returns `false` when nothing was scheduled (already pending, shutting
    /// down, or out of attempts).
    pub fn schedule_reconnection(&self) -> bool {
        if self.inner.cancel.is_cancelled() {
            return false;
        }

        if self.inner.retry_pending.swap(true, Ordering::AcqRel) {
            tracing::debug!("Reconnection already pending");
            return false;
        }

        let mut attempt = 0;
        self.update(|s| {
            s.attempts += 1;
            attempt = s.attempts;
        });

        let policy = self.inner.config.reconnect;
        let Some(delay) = policy.delay_for(attempt) else {
            self.inner.retry_pending.store(false, Ordering::Release);
            tracing::warn!(
                max_attempts = policy.max_attempts,
                "Giving up on database reconnection; restart the service once the database is back",
            );
            return false;
        };

        tracing::info!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Scheduling database reconnection",
        );

        let events = self.inner.events_tx.clone();
        let cancel = self.inner.cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(ConnectionEvent::RetryDue);
                }
            }
        });
        self.track(handle);

        true
    }

    /// Actively probe the database. Any failure counts as unhealthy.
    pub async fn is_healthy(&self) -> bool {
        let Some(pool) = self.current_pool().await else {
            return false;
        };

        match tokio::time::timeout(
            self.inner.config.server_selection_timeout,
            crate::health_check(&pool),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Database ping failed");
                false
            }
            Err(_) => {
                tracing::warn!("Database ping timed out");
                false
            }
        }
    }

    /// Storage statistics, or an error descriptor when they cannot be read.
    pub async fn stats(&self) -> StatsReport {
        let Some(pool) = self.current_pool().await else {
            return StatsReport::Unavailable {
                error: "Database not connected".to_string(),
            };
        };

        match crate::storage_stats(&pool).await {
            Ok(stats) => StatsReport::Available(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read storage statistics");
                self.report_connection_error(&e);
                StatsReport::Unavailable {
                    error: e.to_string(),
                }
            }
        }
    }

    /// The live pool, or `StorageUnavailable` when not connected.
    pub async fn pool(&self) -> Result<DbPool, CoreError> {
        self.current_pool().await.ok_or_else(|| {
            CoreError::StorageUnavailable("Database connection is not available".to_string())
        })
    }

    /// Forward a connection-class error to the listener as a lost connection.
    ///
    /// Statement-level errors are ignored.
    pub fn report_connection_error(&self, err: &sqlx::Error) {
        if is_connection_error(err) {
            self.notify(ConnectionEvent::Lost {
                reason: err.to_string(),
            });
        }
    }

    /// Queue an event for the listener task.
    pub fn notify(&self, event: ConnectionEvent) {
        let _ = self.inner.events_tx.send(event);
    }

    /// Start the event listener and the liveness watcher.
    pub fn start(&self) {
        self.spawn_event_listener();
        self.spawn_liveness_watcher();
    }

    /// Spawn the task that consumes [`ConnectionEvent`]s. Only the first
    /// call has any effect.
    pub fn spawn_event_listener(&self) {
        let receiver = self.lock_receiver().take();
        let Some(mut events) = receiver else {
            tracing::warn!("Connection event listener already running");
            return;
        };

        let manager = self.clone();
        let cancel = self.inner.cancel.clone();
        self.spawn_supervised("event listener", async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => manager.handle_event(event).await,
                        None => break,
                    },
                }
            }
            tracing::debug!("Connection event listener stopped");
        });
    }

    /// Spawn the task that pings a connected pool on a fixed interval and
    /// reports a lost connection when the ping fails.
    pub fn spawn_liveness_watcher(&self) {
        let manager = self.clone();
        let cancel = self.inner.cancel.clone();
        let period = self.inner.config.liveness_interval;

        self.spawn_supervised("liveness watcher", async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if manager.is_connected() && !manager.is_healthy().await {
                            manager.notify(ConnectionEvent::Lost {
                                reason: "liveness probe failed".to_string(),
                            });
                        }
                    }
                }
            }
            tracing::debug!("Connection liveness watcher stopped");
        });
    }

    /// Cancel pending retries, stop background tasks and disconnect.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down connection manager");
        self.inner.cancel.cancel();

        let handles = std::mem::take(&mut *self.lock_tasks());
        for mut handle in handles {
            if tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, &mut handle)
                .await
                .is_err()
            {
                tracing::warn!("Connection task did not stop in time, aborting");
                handle.abort();
            }
        }

        self.disconnect().await;
        tracing::info!("Connection manager shut down");
    }

    // ---- private helpers ----

    async fn attempt_connect(&self, retrying: bool) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        self.update(|s| s.phase = ConnectionPhase::Connecting);
        tracing::info!(retrying, "Connecting to database");

        match self.inner.connector.connect(&self.inner.config).await {
            Ok(pool) if self.inner.cancel.is_cancelled() => {
                tracing::info!("Connected after shutdown began, closing");
                pool.close().await;
            }
            Ok(pool) => {
                let stale = self.inner.pool.write().await.replace(pool);
                if let Some(stale) = stale {
                    stale.close().await;
                }

                let (host, port, name) = describe_target(&self.inner.config.url);
                tracing::info!(
                    host = host.as_deref().unwrap_or("unknown"),
                    port = ?port,
                    database = name.as_deref().unwrap_or("unknown"),
                    "Database connected",
                );
                self.update(|s| {
                    s.phase = ConnectionPhase::Connected;
                    s.attempts = 0;
                    s.host = host;
                    s.port = port;
                    s.name = name;
                    s.last_error = None;
                });
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "Database connection failed");
                self.update(|s| {
                    s.phase = ConnectionPhase::Error;
                    s.last_error = Some(message);
                });

                if retrying || self.inner.config.run_mode.is_production() {
                    self.schedule_reconnection();
                } else {
                    tracing::warn!(
                        mode = self.inner.config.run_mode.as_str(),
                        "Continuing without a database; project routes will respond 503",
                    );
                }
            }
        }
    }

    async fn handle_event(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Lost { reason } => {
                if !self.is_connected() {
                    return;
                }
                tracing::warn!(reason = %reason, "Database connection lost");

                let stale = self.inner.pool.write().await.take();
                self.update(|s| {
                    s.phase = ConnectionPhase::Disconnected;
                    s.last_error = Some(reason);
                });
                if let Some(pool) = stale {
                    tokio::spawn(async move { pool.close().await });
                }

                self.schedule_reconnection();
            }
            ConnectionEvent::RetryDue => {
                self.inner.retry_pending.store(false, Ordering::Release);
                if self.is_connected() {
                    return;
                }
                self.attempt_connect(true).await;
            }
        }
    }

    async fn current_pool(&self) -> Option<DbPool> {
        if !self.is_connected() {
            return None;
        }
        self.inner.pool.read().await.clone()
    }

    fn update(&self, modify: impl FnOnce(&mut ConnectionState)) {
        self.inner.state.send_modify(modify);
    }

    /// Run `task` under a tracked supervisor that trips the fault token if
    /// it panics. Aborting the supervisor aborts the task with it.
    fn spawn_supervised<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let fault = self.inner.fault.clone();
        let task = AbortOnDropHandle::new(tokio::spawn(task));
        let handle = tokio::spawn(async move {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(task = name, error = %e, "Connection background task panicked");
                    fault.cancel();
                }
            }
        });
        self.track(handle);
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_receiver(&self) -> MutexGuard<'_, Option<mpsc::UnboundedReceiver<ConnectionEvent>>> {
        self.inner.events_rx.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Host, port and database name from a connection URL, for status reporting.
fn describe_target(url: &str) -> (Option<String>, Option<u16>, Option<String>) {
    match PgConnectOptions::from_str(url) {
        Ok(options) => (
            Some(options.get_host().to_string()),
            Some(options.get_port()),
            options.get_database().map(str::to_string),
        ),
        Err(_) => (None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use assert_matches::assert_matches;
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::config::RunMode;

    /// Nothing listens on port 1, so any accidental connect fails fast.
    const UNREACHABLE_URL: &str = "postgres://127.0.0.1:1/projectdeck_test";

    /// Fails every call, counting how often it was asked.
    #[derive(Default)]
    struct FailingConnector {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Connector for FailingConnector {
        async fn connect(&self, _config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    /// Succeeds with a lazy pool that never opens a socket.
    #[derive(Default)]
    struct LazyConnector {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Connector for LazyConnector {
        async fn connect(&self, config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PgPoolOptions::new().connect_lazy(&config.url)
        }
    }

    fn test_config(run_mode: RunMode) -> DatabaseConfig {
        DatabaseConfig {
            url: UNREACHABLE_URL.to_string(),
            liveness_interval: Duration::from_secs(3600),
            run_mode,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn starts_disconnected() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(FailingConnector::default()),
        );
        let status = manager.status();
        assert!(!status.is_connected);
        assert_eq!(status.state, ConnectionPhase::Disconnected);
        assert_eq!(status.attempts, 0);
        assert!(status.host.is_none());
    }

    #[tokio::test]
    async fn successful_connect_records_target() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.connect().await;

        let status = manager.status();
        assert!(status.is_connected);
        assert_eq!(status.ready_state, 1);
        assert_eq!(status.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(status.port, Some(1));
        assert_eq!(status.name.as_deref(), Some("projectdeck_test"));
        assert!(manager.pool().await.is_ok());

        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn development_failure_does_not_retry() {
        let connector = Arc::new(FailingConnector::default());
        let manager = ConnectionManager::new(test_config(RunMode::Development), connector.clone());
        manager.spawn_event_listener();

        manager.connect().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.phase(), ConnectionPhase::Error);
        assert_eq!(manager.status().attempts, 0);
        assert!(manager.status().last_error.is_some());
        assert_matches!(manager.pool().await, Err(CoreError::StorageUnavailable(_)));

        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn production_gives_up_after_five_retries() {
        let connector = Arc::new(FailingConnector::default());
        let manager = ConnectionManager::new(test_config(RunMode::Production), connector.clone());
        manager.spawn_event_listener();

        manager.connect().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        // One initial attempt plus five retries.
        assert_eq!(connector.calls.load(Ordering::SeqCst), 6);
        assert_eq!(manager.status().attempts, 6);
        assert!(!manager.is_connected());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(connector.calls.load(Ordering::SeqCst), 6);

        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn retries_wait_the_fixed_delay() {
        let connector = Arc::new(FailingConnector::default());
        let manager = ConnectionManager::new(test_config(RunMode::Production), connector.clone());
        manager.spawn_event_listener();

        manager.connect().await;
        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);

        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn only_one_retry_is_pending() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Production),
            Arc::new(FailingConnector::default()),
        );

        assert!(manager.schedule_reconnection());
        assert!(!manager.schedule_reconnection());
        assert_eq!(manager.status().attempts, 1);

        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn lost_connection_reconnects() {
        let connector = Arc::new(LazyConnector::default());
        let manager = ConnectionManager::new(test_config(RunMode::Development), connector.clone());
        manager.spawn_event_listener();
        manager.connect().await;
        assert!(manager.is_connected());

        manager.notify(ConnectionEvent::Lost {
            reason: "socket closed".into(),
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(manager.phase(), ConnectionPhase::Disconnected);
        assert_eq!(manager.status().attempts, 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(manager.is_connected());
        assert_eq!(manager.status().attempts, 0);
        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn statement_errors_are_not_connection_loss() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.spawn_event_listener();
        manager.connect().await;

        manager.report_connection_error(&sqlx::Error::RowNotFound);
        tokio::task::yield_now().await;
        assert!(manager.is_connected());

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.connect().await;

        manager.disconnect().await;
        manager.disconnect().await;

        assert_eq!(manager.phase(), ConnectionPhase::Disconnected);
        assert_matches!(manager.pool().await, Err(CoreError::StorageUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_retry() {
        let connector = Arc::new(FailingConnector::default());
        let manager = ConnectionManager::new(test_config(RunMode::Production), connector.clone());
        manager.spawn_event_listener();

        manager.connect().await;
        manager.shutdown().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.phase(), ConnectionPhase::Disconnected);
    }

    #[tokio::test]
    async fn probes_report_unavailable_when_disconnected() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(FailingConnector::default()),
        );
        assert!(!manager.is_healthy().await);
        assert_matches!(manager.stats().await, StatsReport::Unavailable { .. });
    }

    /// Panics on every call.
    struct PanickingConnector;

    #[async_trait]
    impl Connector for PanickingConnector {
        async fn connect(&self, _config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
            panic!("connector exploded");
        }
    }

    /// Connects lazily, but only after a long delay.
    struct SlowConnector;

    #[async_trait]
    impl Connector for SlowConnector {
        async fn connect(&self, config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            PgPoolOptions::new().connect_lazy(&config.url)
        }
    }

    #[tokio::test]
    async fn pool_timeout_keeps_connection() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.spawn_event_listener();
        manager.connect().await;

        manager.report_connection_error(&sqlx::Error::PoolTimedOut);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(manager.is_connected());
        assert_eq!(manager.status().attempts, 0);
        assert!(manager.pool().await.is_ok());

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn closed_pool_is_connection_loss() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.spawn_event_listener();
        manager.connect().await;

        manager.report_connection_error(&sqlx::Error::PoolClosed);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!manager.is_connected());
        assert_eq!(manager.status().attempts, 1);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn listener_panic_is_reported() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(PanickingConnector),
        );
        manager.spawn_event_listener();

        manager.notify(ConnectionEvent::RetryDue);

        tokio::time::timeout(Duration::from_secs(5), manager.background_failure())
            .await
            .expect("listener panic should trip the failure signal");
    }

    #[tokio::test(start_paused = true)]
    async fn clean_shutdown_is_not_a_failure() {
        let manager = ConnectionManager::new(
            test_config(RunMode::Test),
            Arc::new(LazyConnector::default()),
        );
        manager.start();
        manager.shutdown().await;

        let failed =
            tokio::time::timeout(Duration::from_secs(60), manager.background_failure()).await;
        assert!(failed.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_abandons_connect_in_progress() {
        let manager = ConnectionManager::new(test_config(RunMode::Test), Arc::new(SlowConnector));
        manager.spawn_event_listener();

        manager.notify(ConnectionEvent::RetryDue);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(manager.phase(), ConnectionPhase::Connecting);

        manager.shutdown().await;
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(manager.phase(), ConnectionPhase::Disconnected);
        assert_matches!(manager.pool().await, Err(CoreError::StorageUnavailable(_)));
    }

    #[test]
    fn describe_target_parses_url() {
        let (host, port, name) = describe_target("postgres://user:pw@db.internal:6543/projects");
        assert_eq!(host.as_deref(), Some("db.internal"));
        assert_eq!(port, Some(6543));
        assert_eq!(name.as_deref(), Some("projects"));
    }
}
