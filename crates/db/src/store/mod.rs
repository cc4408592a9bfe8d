//! The [`ProjectStore`] seam between HTTP handlers and storage.
//!
//! Handlers only see this trait, so the Postgres implementation can be
//! swapped for [`InMemoryProjectStore`] in tests and local tooling.

mod memory;
mod postgres;

use async_trait::async_trait;
use projectdeck_core::error::CoreResult;
use projectdeck_core::project::{NewProject, ProjectChanges};
use projectdeck_core::types::DbId;

use crate::models::project::Project;

pub use memory::InMemoryProjectStore;
pub use postgres::PgProjectStore;

/// Entity name used in `NotFound` errors.
pub const PROJECT_ENTITY: &str = "Project";

/// Persistence operations for projects.
///
/// Every failure is already classified into a `CoreError`; no raw driver
/// error crosses this boundary.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Persist a new project with a system-assigned id and timestamps.
    async fn create(&self, input: NewProject) -> CoreResult<Project>;

    /// Every project, most recently created first. Empty when none exist.
    async fn list(&self) -> CoreResult<Vec<Project>>;

    /// The project with `id`, or `NotFound`.
    async fn find_by_id(&self, id: DbId) -> CoreResult<Project>;

    /// Apply `changes`, refresh `updated_at` and return the new record.
    async fn update(&self, id: DbId, changes: ProjectChanges) -> CoreResult<Project>;

    /// Remove the project, returning its id as confirmation.
    async fn delete(&self, id: DbId) -> CoreResult<DbId>;
}
