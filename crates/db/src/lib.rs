//! Storage layer for the project service.
//!
//! Pool creation, migrations, the `projects` repository, the
//! [`store::ProjectStore`] seam used by the HTTP handlers, and the
//! [`connection::ConnectionManager`] that owns the database link.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

use config::DatabaseConfig;
use models::stats::StorageStats;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from the database configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_pool_size)
        .acquire_timeout(config.server_selection_timeout)
        .idle_timeout(Some(config.socket_timeout))
        .max_lifetime(Some(Duration::from_secs(30 * 60)))
        .connect(&config.url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Aggregate table and index sizes for the `public` schema.
pub async fn storage_stats(pool: &DbPool) -> Result<StorageStats, sqlx::Error> {
    sqlx::query_as::<_, StorageStats>(
        "SELECT
            COUNT(*)::BIGINT AS collections,
            COALESCE(SUM(n_live_tup), 0)::BIGINT AS objects,
            COALESCE(SUM(pg_table_size(relid)), 0)::BIGINT AS data_size,
            COALESCE(SUM(pg_indexes_size(relid)), 0)::BIGINT AS index_size
         FROM pg_stat_user_tables
         WHERE schemaname = 'public'",
    )
    .fetch_one(pool)
    .await
}
