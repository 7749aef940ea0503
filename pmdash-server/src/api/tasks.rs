//! Task CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{tasks, CreateTask, Task, UpdateTask};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Identified<Task>>)> {
    let task = tasks::create_task(&state.db, &input).await?;
    tracing::info!(task_id = task.task_id, project_id = task.project_id, "Task created");
    Ok((StatusCode::CREATED, record_json(task)))
}

/// GET /api/tasks[?project_id=]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<Task>>>> {
    let (skip, limit) = query.bounds();
    let rows = match query.project_id {
        Some(project_id) => tasks::list_tasks_by_project(&state.db, project_id, skip, limit).await?,
        None => tasks::list_tasks(&state.db, skip, limit).await?,
    };
    Ok(record_list(rows))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Identified<Task>>> {
    tasks::get_task(&state.db, task_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", task_id)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Json(update): Json<UpdateTask>,
) -> ApiResult<Json<Identified<Task>>> {
    tasks::update_task(&state.db, task_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", task_id)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !tasks::delete_task(&state.db, task_id).await? {
        return Err(ApiError::NotFound(format!("Task {} not found", task_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
}
