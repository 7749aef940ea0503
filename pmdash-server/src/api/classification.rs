//! KPI classification endpoint

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use pmdash_common::db::ProjectKpi;

use crate::error::ApiResult;
use crate::AppState;
use super::response::{record_json, Identified};

/// POST /api/projects/:project_id/classify-kpi
///
/// 404 when the project has no KPI record, 503 when the classifier fails,
/// 500 when the record store fails. The stored record is untouched on error.
pub async fn classify_kpi(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Identified<ProjectKpi>>> {
    let kpi = state.orchestrator.classify_project(project_id).await?;
    Ok(record_json(kpi))
}

pub fn classification_routes() -> Router<AppState> {
    Router::new().route("/api/projects/:project_id/classify-kpi", post(classify_kpi))
}
