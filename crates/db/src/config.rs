use std::time::Duration;

use crate::connection::reconnect::ReconnectPolicy;

/// Deployment mode, read from `APP_ENV`.
///
/// Only `production` changes connection behaviour: a failed initial connect
/// is retried. Other modes keep serving with the data routes gated off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    Production,
    #[default]
    Development,
    Test,
}

impl RunMode {
    /// Parse an `APP_ENV` value. Unrecognised values fall back to development.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RunMode::Production,
            "test" => RunMode::Test,
            _ => RunMode::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Production => "production",
            RunMode::Development => "development",
            RunMode::Test => "test",
        }
    }
}

/// Database connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound on pooled connections (default: `10`).
    pub max_pool_size: u32,
    /// How long to wait for a usable server when acquiring a connection.
    pub server_selection_timeout: Duration,
    /// Idle connections older than this are closed by the pool.
    pub socket_timeout: Duration,
    /// How often a connected pool is probed for liveness.
    pub liveness_interval: Duration,
    pub reconnect: ReconnectPolicy,
    pub run_mode: RunMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/projectdeck".into(),
            max_pool_size: 10,
            server_selection_timeout: Duration::from_millis(5000),
            socket_timeout: Duration::from_millis(45_000),
            liveness_interval: Duration::from_secs(10),
            reconnect: ReconnectPolicy::default(),
            run_mode: RunMode::Development,
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                                  |
    /// |----------------------------------|------------------------------------------|
    /// | `DATABASE_URL`                   | `postgres://localhost:5432/projectdeck`  |
    /// | `DB_MAX_POOL_SIZE`               | `10`                                     |
    /// | `DB_SERVER_SELECTION_TIMEOUT_MS` | `5000`                                   |
    /// | `DB_SOCKET_TIMEOUT_MS`           | `45000`                                  |
    /// | `DB_LIVENESS_INTERVAL_SECS`      | `10`                                     |
    /// | `DB_RECONNECT_MAX_ATTEMPTS`      | `5`                                      |
    /// | `DB_RECONNECT_DELAY_MS`          | `5000`                                   |
    /// | `APP_ENV`                        | `development`                            |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.url);

        let max_pool_size: u32 = env_or("DB_MAX_POOL_SIZE", defaults.max_pool_size);

        let server_selection_timeout = Duration::from_millis(env_or(
            "DB_SERVER_SELECTION_TIMEOUT_MS",
            defaults.server_selection_timeout.as_millis() as u64,
        ));

        let socket_timeout = Duration::from_millis(env_or(
            "DB_SOCKET_TIMEOUT_MS",
            defaults.socket_timeout.as_millis() as u64,
        ));

        let liveness_interval = Duration::from_secs(env_or(
            "DB_LIVENESS_INTERVAL_SECS",
            defaults.liveness_interval.as_secs(),
        ));

        let reconnect = ReconnectPolicy {
            max_attempts: env_or("DB_RECONNECT_MAX_ATTEMPTS", defaults.reconnect.max_attempts),
            delay: Duration::from_millis(env_or(
                "DB_RECONNECT_DELAY_MS",
                defaults.reconnect.delay.as_millis() as u64,
            )),
        };

        let run_mode = std::env::var("APP_ENV")
            .map(|v| RunMode::from_env_value(&v))
            .unwrap_or_default();

        Self {
            url,
            max_pool_size,
            server_selection_timeout,
            socket_timeout,
            liveness_interval,
            reconnect,
            run_mode,
        }
    }
}

/// Read and parse an environment variable, panicking on a malformed value.
///
/// Misconfiguration should fail at startup rather than be silently replaced.
fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got '{raw}'")),
        Err(_) => default,
    }
}
