//! pmdash-server library - project management dashboard service
//!
//! REST surface over the record store plus the KPI classification action.

use axum::http::HeaderValue;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod kpi;
pub mod pagination;

use kpi::KpiOrchestrator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Classification driver
    pub orchestrator: Arc<KpiOrchestrator>,
}

impl AppState {
    pub fn new(db: SqlitePool, orchestrator: Arc<KpiOrchestrator>) -> Self {
        Self { db, orchestrator }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::customer_routes())
        .merge(api::employee_routes())
        .merge(api::project_routes())
        .merge(api::task_routes())
        .merge(api::alert_routes())
        .merge(api::budget_history_routes())
        .merge(api::project_kpi_routes())
        .merge(api::classification_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer allowing the configured browser origins.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
