//! Alert CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{alerts, Alert, CreateAlert, UpdateAlert};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

pub async fn create_alert(
    State(state): State<AppState>,
    Json(input): Json<CreateAlert>,
) -> ApiResult<(StatusCode, Json<Identified<Alert>>)> {
    let alert = alerts::create_alert(&state.db, &input).await?;
    tracing::info!(
        alert_id = alert.alert_id,
        alert_type = %alert.alert_type,
        "Alert created"
    );
    Ok((StatusCode::CREATED, record_json(alert)))
}

/// GET /api/alerts[?project_id=]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<Alert>>>> {
    let (skip, limit) = query.bounds();
    let rows = match query.project_id {
        Some(project_id) => {
            alerts::list_alerts_by_project(&state.db, project_id, skip, limit).await?
        }
        None => alerts::list_alerts(&state.db, skip, limit).await?,
    };
    Ok(record_list(rows))
}

pub async fn get_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<i64>,
) -> ApiResult<Json<Identified<Alert>>> {
    alerts::get_alert(&state.db, alert_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Alert {} not found", alert_id)))
}

/// PUT /api/alerts/:alert_id (typically marking it Read)
pub async fn update_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<i64>,
    Json(update): Json<UpdateAlert>,
) -> ApiResult<Json<Identified<Alert>>> {
    alerts::update_alert(&state.db, alert_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Alert {} not found", alert_id)))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !alerts::delete_alert(&state.db, alert_id).await? {
        return Err(ApiError::NotFound(format!("Alert {} not found", alert_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route(
            "/api/alerts/:alert_id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
}
