//! Monthly budget history endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{
    budget_history, BudgetHistory, CreateBudgetHistory, UpdateBudgetHistory,
};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

pub async fn create_budget_history(
    State(state): State<AppState>,
    Json(input): Json<CreateBudgetHistory>,
) -> ApiResult<(StatusCode, Json<Identified<BudgetHistory>>)> {
    let entry = budget_history::create_budget_history(&state.db, &input).await?;
    tracing::info!(
        history_id = entry.history_id,
        project_id = entry.project_id,
        month = %entry.month,
        "Budget history entry created"
    );
    Ok((StatusCode::CREATED, record_json(entry)))
}

/// GET /api/budget-history[?project_id=]
///
/// Per-project listings come back in month order.
pub async fn list_budget_history(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<BudgetHistory>>>> {
    let (skip, limit) = query.bounds();
    let rows = match query.project_id {
        Some(project_id) => {
            budget_history::list_budget_history_by_project(&state.db, project_id, skip, limit)
                .await?
        }
        None => budget_history::list_budget_history(&state.db, skip, limit).await?,
    };
    Ok(record_list(rows))
}

pub async fn get_budget_history(
    State(state): State<AppState>,
    Path(history_id): Path<i64>,
) -> ApiResult<Json<Identified<BudgetHistory>>> {
    budget_history::get_budget_history(&state.db, history_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Budget history {} not found", history_id)))
}

pub async fn update_budget_history(
    State(state): State<AppState>,
    Path(history_id): Path<i64>,
    Json(update): Json<UpdateBudgetHistory>,
) -> ApiResult<Json<Identified<BudgetHistory>>> {
    budget_history::update_budget_history(&state.db, history_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Budget history {} not found", history_id)))
}

pub async fn delete_budget_history(
    State(state): State<AppState>,
    Path(history_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !budget_history::delete_budget_history(&state.db, history_id).await? {
        return Err(ApiError::NotFound(format!(
            "Budget history {} not found",
            history_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn budget_history_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/budget-history",
            get(list_budget_history).post(create_budget_history),
        )
        .route(
            "/api/budget-history/:history_id",
            get(get_budget_history)
                .put(update_budget_history)
                .delete(delete_budget_history),
        )
}
