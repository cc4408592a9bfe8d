//! Storage-level statistics reported by the health endpoint.

use serde::Serialize;
use sqlx::FromRow;

/// Aggregate size figures for the connected database.
///
/// "Collections" are user tables and "objects" is the planner's live-row
/// estimate summed across them, so the figures are approximate.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub collections: i64,
    pub objects: i64,
    pub data_size: i64,
    pub index_size: i64,
}

/// Outcome of a statistics request. Never an error at the call site.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatsReport {
    Available(StorageStats),
    Unavailable { error: String },
}
