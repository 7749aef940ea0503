//! Project KPI CRUD endpoints
//!
//! `kpi_class` can be set by hand here; the classification endpoint in
//! [`super::classification`] sets it from the classifier.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{project_kpis, CreateProjectKpi, ProjectKpi, UpdateProjectKpi};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

pub async fn create_project_kpi(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectKpi>,
) -> ApiResult<(StatusCode, Json<Identified<ProjectKpi>>)> {
    let kpi = project_kpis::create_project_kpi(&state.db, &input).await?;
    tracing::info!(kpi_id = kpi.kpi_id, project_id = kpi.project_id, "Project KPI created");
    Ok((StatusCode::CREATED, record_json(kpi)))
}

/// GET /api/project-kpis[?project_id=]
pub async fn list_project_kpis(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<ProjectKpi>>>> {
    let (skip, limit) = query.bounds();
    let rows = match query.project_id {
        Some(project_id) => {
            project_kpis::list_kpis_by_project(&state.db, project_id, skip, limit).await?
        }
        None => project_kpis::list_project_kpis(&state.db, skip, limit).await?,
    };
    Ok(record_list(rows))
}

pub async fn get_project_kpi(
    State(state): State<AppState>,
    Path(kpi_id): Path<i64>,
) -> ApiResult<Json<Identified<ProjectKpi>>> {
    project_kpis::get_project_kpi(&state.db, kpi_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Project KPI {} not found", kpi_id)))
}

/// GET /api/projects/:project_id/kpi
pub async fn get_kpi_for_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Identified<ProjectKpi>>> {
    project_kpis::get_kpi_by_project(&state.db, project_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("No KPI record for project {}", project_id)))
}

pub async fn update_project_kpi(
    State(state): State<AppState>,
    Path(kpi_id): Path<i64>,
    Json(update): Json<UpdateProjectKpi>,
) -> ApiResult<Json<Identified<ProjectKpi>>> {
    project_kpis::update_project_kpi(&state.db, kpi_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Project KPI {} not found", kpi_id)))
}

pub async fn delete_project_kpi(
    State(state): State<AppState>,
    Path(kpi_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !project_kpis::delete_project_kpi(&state.db, kpi_id).await? {
        return Err(ApiError::NotFound(format!("Project KPI {} not found", kpi_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn project_kpi_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/project-kpis",
            get(list_project_kpis).post(create_project_kpi),
        )
        .route(
            "/api/project-kpis/:kpi_id",
            get(get_project_kpi)
                .put(update_project_kpi)
                .delete(delete_project_kpi),
        )
        .route("/api/projects/:project_id/kpi", get(get_kpi_for_project))
}
