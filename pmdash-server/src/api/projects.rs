//! Project CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{projects, CreateProject, Project, UpdateProject};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Identified<Project>>)> {
    let project = projects::create_project(&state.db, &input).await?;
    tracing::info!(
        project_id = project.project_id,
        customer_id = project.customer_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, record_json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<Project>>>> {
    let (skip, limit) = query.bounds();
    Ok(record_list(projects::list_projects(&state.db, skip, limit).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Identified<Project>>> {
    projects::get_project(&state.db, project_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", project_id)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(update): Json<UpdateProject>,
) -> ApiResult<Json<Identified<Project>>> {
    projects::update_project(&state.db, project_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", project_id)))
}

/// DELETE /api/projects/:project_id
///
/// 409 while tasks, alerts, budget history or KPI rows still reference it.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !projects::delete_project(&state.db, project_id).await? {
        return Err(ApiError::NotFound(format!("Project {} not found", project_id)));
    }
    tracing::info!(project_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
}
