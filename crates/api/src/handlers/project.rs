//! Handlers for the `/projects` resource.
//!
//! Every handler takes [`RequireStorage`] first, so a disconnected database
//! yields 503 before the id or body is looked at.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use projectdeck_core::project::ProjectInput;
use projectdeck_core::types::{parse_db_id, DbId};
use projectdeck_db::models::project::Project;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::connection::RequireStorage;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Confirmation payload for a delete.
#[derive(Debug, Serialize)]
pub struct DeletedProject {
    pub id: DbId,
}

/// GET /api/projects
pub async fn list(
    _db: RequireStorage,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Project>>>> {
    let projects = state.projects.list().await?;
    let count = projects.len();
    Ok(Json(ApiResponse::data(projects).with_count(count)))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    _db: RequireStorage,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let id = parse_db_id(&id)?;
    let project = state.projects.find_by_id(id).await?;
    Ok(Json(ApiResponse::data(project)))
}

/// POST /api/projects
pub async fn create(
    _db: RequireStorage,
    State(state): State<AppState>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Project>>)> {
    let Json(input) = body?;
    let new_project = input.into_new_project()?;
    let project = state.projects.create(new_project).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(project).with_message("Project created successfully")),
    ))
}

/// PUT /api/projects/{id}
pub async fn update(
    _db: RequireStorage,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let id = parse_db_id(&id)?;
    let Json(input) = body?;
    let changes = input.into_changes()?;
    let project = state.projects.update(id, changes).await?;
    Ok(Json(
        ApiResponse::data(project).with_message("Project updated successfully"),
    ))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    _db: RequireStorage,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedProject>>> {
    let id = parse_db_id(&id)?;
    let id = state.projects.delete(id).await?;
    Ok(Json(
        ApiResponse::data(DeletedProject { id }).with_message("Project deleted successfully"),
    ))
}
