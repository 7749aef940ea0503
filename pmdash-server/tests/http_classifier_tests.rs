//! HttpClassifier against a local stand-in classification service

use axum::{http::StatusCode, routing::post, Json, Router};
use pmdash_common::config::ClassifierConfig;
use pmdash_common::db::KpiClass;
use pmdash_server::kpi::{ClassificationError, HttpClassifier, KpiClassifier, KpiSnapshot};
use serde_json::{json, Value};
use std::time::Duration;

/// Serve `router` on an ephemeral port, returning its base URL
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn classifier(base_url: &str, timeout_ms: u64) -> HttpClassifier {
    HttpClassifier::new(&ClassifierConfig {
        endpoint: format!("{}/classify", base_url),
        timeout_ms,
        max_wait_ms: None,
    })
    .unwrap()
}

fn snapshot() -> KpiSnapshot {
    KpiSnapshot {
        completion_percentage: 80.0,
        milestone_completion: 75.0,
        budget_utilization: 60.0,
        schedule_variance: -2.0,
        overdue_tasks: 2,
        alert_count: 1,
        avg_task_completion_time: 4.5,
        employee_workload_index: 0.8,
        customer_priority_level: 1,
        reopened_tasks: 0,
        risk_flag: true,
    }
}

#[tokio::test]
async fn test_valid_label_from_request_fields() {
    // Echo back High only if the request carried the expected snapshot
    let router = Router::new().route(
        "/classify",
        post(|Json(body): Json<Value>| async move {
            let ok = body.as_object().map(|o| o.len()) == Some(11)
                && body["customer_priority_level"] == 1
                && body["risk_flag"] == true;
            Json(json!({ "kpi_class": if ok { "High" } else { "Low" } }))
        }),
    );
    let base = spawn_service(router).await;

    let result = classifier(&base, 2000).classify(&snapshot()).await;

    assert_eq!(result.unwrap(), KpiClass::High);
}

#[tokio::test]
async fn test_bare_string_response_accepted() {
    let router = Router::new().route("/classify", post(|| async { Json(json!("medium")) }));
    let base = spawn_service(router).await;

    let result = classifier(&base, 2000).classify(&snapshot()).await;

    assert_eq!(result.unwrap(), KpiClass::Medium);
}

#[tokio::test]
async fn test_unknown_label_rejected() {
    let router = Router::new().route(
        "/classify",
        post(|| async { Json(json!({ "kpi_class": "Critical" })) }),
    );
    let base = spawn_service(router).await;

    let result = classifier(&base, 2000).classify(&snapshot()).await;

    assert!(matches!(result, Err(ClassificationError::InvalidLabel(ref l)) if l == "Critical"));
}

#[tokio::test]
async fn test_error_status_reported() {
    let router = Router::new().route(
        "/classify",
        post(|| async { (StatusCode::BAD_GATEWAY, "model offline") }),
    );
    let base = spawn_service(router).await;

    let result = classifier(&base, 2000).classify(&snapshot()).await;

    assert!(matches!(result, Err(ClassificationError::Api(502, _))));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let router = Router::new().route(
        "/classify",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "kpi_class": "High" }))
        }),
    );
    let base = spawn_service(router).await;

    let result = classifier(&base, 100).classify(&snapshot()).await;

    assert!(matches!(result, Err(ClassificationError::Timeout(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_unreachable_service() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = classifier(&format!("http://{}", addr), 2000)
        .classify(&snapshot())
        .await;

    assert!(matches!(result, Err(ClassificationError::Unreachable(_))), "got {:?}", result);
}
