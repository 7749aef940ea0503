//! Employee CRUD endpoints
//!
//! Responses never include the password hash.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{employees, CreateEmployee, Employee, UpdateEmployee};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

/// POST /api/employees
///
/// A second employee with the same e-mail is rejected with 400.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<CreateEmployee>,
) -> ApiResult<(StatusCode, Json<Identified<Employee>>)> {
    if employees::get_employee_by_email(&state.db, &input.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let employee = employees::create_employee(&state.db, &input).await?;
    tracing::info!(employee_id = employee.employee_id, "Employee created");
    Ok((StatusCode::CREATED, record_json(employee)))
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<Employee>>>> {
    let (skip, limit) = query.bounds();
    Ok(record_list(employees::list_employees(&state.db, skip, limit).await?))
}

/// GET /api/employees/:employee_id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> ApiResult<Json<Identified<Employee>>> {
    employees::get_employee(&state.db, employee_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Employee {} not found", employee_id)))
}

/// PUT /api/employees/:employee_id
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(update): Json<UpdateEmployee>,
) -> ApiResult<Json<Identified<Employee>>> {
    employees::update_employee(&state.db, employee_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Employee {} not found", employee_id)))
}

/// DELETE /api/employees/:employee_id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !employees::delete_employee(&state.db, employee_id).await? {
        return Err(ApiError::NotFound(format!("Employee {} not found", employee_id)));
    }
    tracing::info!(employee_id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/:employee_id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
