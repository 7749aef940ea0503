//! Customer CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pmdash_common::db::{customers, CreateCustomer, Customer, UpdateCustomer};

use crate::error::{ApiError, ApiResult};
use crate::pagination::ListQuery;
use crate::AppState;
use super::response::{record_json, record_list, Identified};

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> ApiResult<(StatusCode, Json<Identified<Customer>>)> {
    let customer = customers::create_customer(&state.db, &input).await?;
    tracing::info!(customer_id = customer.customer_id, "Customer created");
    Ok((StatusCode::CREATED, record_json(customer)))
}

/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Identified<Customer>>>> {
    let (skip, limit) = query.bounds();
    Ok(record_list(customers::list_customers(&state.db, skip, limit).await?))
}

/// GET /api/customers/:customer_id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> ApiResult<Json<Identified<Customer>>> {
    customers::get_customer(&state.db, customer_id)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Customer {} not found", customer_id)))
}

/// PUT /api/customers/:customer_id
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Json(update): Json<UpdateCustomer>,
) -> ApiResult<Json<Identified<Customer>>> {
    customers::update_customer(&state.db, customer_id, &update)
        .await?
        .map(record_json)
        .ok_or_else(|| ApiError::NotFound(format!("Customer {} not found", customer_id)))
}

/// DELETE /api/customers/:customer_id
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !customers::delete_customer(&state.db, customer_id).await? {
        return Err(ApiError::NotFound(format!("Customer {} not found", customer_id)));
    }
    tracing::info!(customer_id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/:customer_id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}
