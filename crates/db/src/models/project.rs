//! Project entity model.

use projectdeck_core::project::ProjectStatus;
use projectdeck_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table, serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub repository: Option<String>,
    pub live_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
