use async_trait::async_trait;
use projectdeck_core::error::{CoreError, CoreResult};
use projectdeck_core::project::{NewProject, ProjectChanges};
use projectdeck_core::types::DbId;

use super::{ProjectStore, PROJECT_ENTITY};
use crate::connection::ConnectionManager;
use crate::models::project::Project;
use crate::repositories::ProjectRepo;
use crate::DbPool;

/// [`ProjectStore`] backed by Postgres through the connection manager.
///
/// Each call fetches the live pool from the manager, so an operation issued
/// while disconnected fails with `StorageUnavailable` even if the HTTP gate
/// was bypassed. Connection-class errors are reported back to the manager.
#[derive(Clone)]
pub struct PgProjectStore {
    manager: ConnectionManager,
}

impl PgProjectStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    async fn pool(&self) -> CoreResult<DbPool> {
        self.manager.pool().await
    }

    fn fail(&self, err: sqlx::Error) -> CoreError {
        self.manager.report_connection_error(&err);
        crate::error::classify(err)
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: PROJECT_ENTITY,
        id,
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn create(&self, input: NewProject) -> CoreResult<Project> {
        let pool = self.pool().await?;
        let id = DbId::now_v7();
        let project = ProjectRepo::create(&pool, id, &input)
            .await
            .map_err(|e| self.fail(e))?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    async fn list(&self) -> CoreResult<Vec<Project>> {
        let pool = self.pool().await?;
        ProjectRepo::list(&pool).await.map_err(|e| self.fail(e))
    }

    async fn find_by_id(&self, id: DbId) -> CoreResult<Project> {
        let pool = self.pool().await?;
        ProjectRepo::find_by_id(&pool, id)
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: DbId, changes: ProjectChanges) -> CoreResult<Project> {
        let pool = self.pool().await?;
        let project = ProjectRepo::update(&pool, id, &changes)
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(project_id = %id, "Project updated");
        Ok(project)
    }

    async fn delete(&self, id: DbId) -> CoreResult<DbId> {
        let pool = self.pool().await?;
        let deleted = ProjectRepo::delete(&pool, id)
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(project_id = %deleted, "Project deleted");
        Ok(deleted)
    }
}
