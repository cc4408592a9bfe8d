//! Repository for the `projects` table.

use projectdeck_core::project::{NewProject, ProjectChanges, ProjectStatus};
use projectdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, technologies, status, start_date, end_date, \
                       repository, live_url, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with the given identifier, returning the stored row.
    ///
    /// `created_at` and `updated_at` come from the same `NOW()` so they are
    /// equal on insert. `start_date` defaults to that instant as well.
    pub async fn create(pool: &PgPool, id: DbId, input: &NewProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (id, name, description, technologies, status, start_date, end_date, repository, live_url)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.technologies)
            .bind(input.status.as_str())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.repository)
            .bind(&input.live_url)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its identifier.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// `updated_at` always moves forward, even when two updates land within
    /// the same transaction timestamp. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProjectChanges,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                technologies = COALESCE($4, technologies),
                status = COALESCE($5, status),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                repository = COALESCE($8, repository),
                live_url = COALESCE($9, live_url),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.technologies)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.repository)
            .bind(&input.live_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project. Returns the removed id, or `None` if
    /// no row matched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("DELETE FROM projects WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
