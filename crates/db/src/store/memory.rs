use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use projectdeck_core::error::{CoreError, CoreResult};
use projectdeck_core::project::{NewProject, ProjectChanges};
use projectdeck_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{ProjectStore, PROJECT_ENTITY};
use crate::models::project::Project;

/// In-memory [`ProjectStore`] for tests and local tooling.
///
/// Keeps insertion order so listing can mirror the Postgres ordering
/// (newest first). Timestamps are truncated to microseconds to match what
/// a `TIMESTAMPTZ` column would round-trip.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<Vec<Project>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now_micros() -> Timestamp {
    let now = Utc::now();
    now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000))
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: PROJECT_ENTITY,
        id,
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create(&self, input: NewProject) -> CoreResult<Project> {
        let now = now_micros();
        let project = Project {
            id: DbId::now_v7(),
            name: input.name,
            description: input.description,
            technologies: input.technologies,
            status: input.status,
            start_date: input.start_date.unwrap_or(now),
            end_date: input.end_date,
            repository: input.repository,
            live_url: input.live_url,
            created_at: now,
            updated_at: now,
        };

        self.projects.write().await.push(project.clone());
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    async fn list(&self) -> CoreResult<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> CoreResult<Project> {
        let projects = self.projects.read().await;
        projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: DbId, changes: ProjectChanges) -> CoreResult<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        // Same rule as the table's end-after-start check, applied to the
        // merged record before anything is written.
        let start_date = changes.start_date.unwrap_or(project.start_date);
        if let Some(end_date) = changes.end_date.or(project.end_date) {
            if end_date < start_date {
                return Err(CoreError::Validation(
                    "endDate must not be before startDate".to_string(),
                ));
            }
        }

        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = description;
        }
        if let Some(technologies) = changes.technologies {
            project.technologies = technologies;
        }
        if let Some(status) = changes.status {
            project.status = status;
        }
        if let Some(start_date) = changes.start_date {
            project.start_date = start_date;
        }
        if changes.end_date.is_some() {
            project.end_date = changes.end_date;
        }
        if changes.repository.is_some() {
            project.repository = changes.repository;
        }
        if changes.live_url.is_some() {
            project.live_url = changes.live_url;
        }
        project.updated_at = now_micros().max(project.updated_at + Duration::microseconds(1));

        tracing::info!(project_id = %id, "Project updated");
        Ok(project.clone())
    }

    async fn delete(&self, id: DbId) -> CoreResult<DbId> {
        let mut projects = self.projects.write().await;
        let index = projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        projects.remove(index);

        tracing::info!(project_id = %id, "Project deleted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use projectdeck_core::project::{ProjectInput, ProjectStatus};

    use super::*;

    fn new_project(name: &str) -> NewProject {
        ProjectInput {
            name: Some(name.to_string()),
            description: Some("A description".to_string()),
            ..Default::default()
        }
        .into_new_project()
        .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let store = InMemoryProjectStore::new();
        let project = store.create(new_project("P1")).await.unwrap();

        assert_eq!(project.created_at, project.updated_at);
        assert_eq!(project.start_date, project.created_at);
        assert_eq!(project.status, ProjectStatus::Planning);
    }

    #[tokio::test]
    async fn fetch_returns_created_record() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();
        let fetched = store.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryProjectStore::new();
        store.create(new_project("first")).await.unwrap();
        store.create(new_project("second")).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn list_empty_is_ok() {
        let store = InMemoryProjectStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_advances_updated_at_only() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();

        let changes = ProjectChanges {
            status: Some(ProjectStatus::Completed),
            ..Default::default()
        };
        let updated = store.update(created.id, changes).await.unwrap();

        assert_eq!(updated.status, ProjectStatus::Completed);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = InMemoryProjectStore::new();
        let result = store.update(DbId::now_v7(), ProjectChanges::default()).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), created.id);
        assert_matches!(store.delete(created.id).await, Err(CoreError::NotFound { .. }));
        assert_matches!(
            store.find_by_id(created.id).await,
            Err(CoreError::NotFound { .. })
        );
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_end_before_stored_start() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();

        let changes = ProjectChanges {
            name: Some("Renamed".to_string()),
            end_date: Some(created.start_date - Duration::days(30)),
            ..Default::default()
        };
        let result = store.update(created.id, changes).await;
        assert_matches!(result, Err(CoreError::Validation(_)));

        let stored = store.find_by_id(created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn update_rejects_start_after_stored_end() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();
        let with_end = ProjectChanges {
            end_date: Some(created.start_date + Duration::days(10)),
            ..Default::default()
        };
        store.update(created.id, with_end).await.unwrap();

        let changes = ProjectChanges {
            start_date: Some(created.start_date + Duration::days(20)),
            ..Default::default()
        };
        assert_matches!(
            store.update(created.id, changes).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn update_accepts_end_on_start() {
        let store = InMemoryProjectStore::new();
        let created = store.create(new_project("P1")).await.unwrap();

        let changes = ProjectChanges {
            end_date: Some(created.start_date),
            ..Default::default()
        };
        let updated = store.update(created.id, changes).await.unwrap();
        assert_eq!(updated.end_date, Some(created.start_date));
    }
}
