//! Parameter validation tests driven through the router.
//!
//! The warehouse pool is lazy and points nowhere, so any request that
//! reaches query execution fails with a 500. Everything asserted here must
//! therefore be decided before a query runs, which is exactly the contract
//! under test.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use repostats::config::AppConfig;
use repostats::database::Warehouse;
use repostats::routes;

fn test_router() -> Router {
    let config = AppConfig {
        database_url: "postgres://127.0.0.1:1/github_events".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        max_connections: 1,
    };
    let warehouse =
        Warehouse::connect_lazy(&config.database_url, config.max_connections).expect("lazy pool");
    routes::router((config, warehouse))
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(test_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "repostats");
}

#[tokio::test]
async fn test_contributor_lookback_of_zero_rejected() {
    let (status, body) = get(
        test_router(),
        "/stats/contributors/new?repo_name=acme/widgets&months=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("months"));
}

#[tokio::test]
async fn test_contributor_lookback_over_limit_rejected() {
    let (status, body) = get(
        test_router(),
        "/stats/contributors/new?repo_name=acme/widgets&months=25",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("between 1 and 24"));
}

#[tokio::test]
async fn test_contributor_lookback_at_limit_passes_validation() {
    // With no warehouse behind the pool this reaches query execution and
    // fails there; the point is that validation did not reject it.
    let (status, _body) = get(
        test_router(),
        "/stats/contributors/new?repo_name=acme/widgets&months=24",
    )
    .await;
    assert_ne!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_start_month_rejected() {
    let (status, body) = get(
        test_router(),
        "/stats/releases/frequency?repo_name=acme/widgets&start_month=2024-13",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("YYYY-MM"));
}

#[tokio::test]
async fn test_inverted_month_window_rejected() {
    let (status, body) = get(
        test_router(),
        "/stats/releases/frequency?repo_name=acme/widgets&start_month=2024-06&end_month=2024-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("after"));
}

#[tokio::test]
async fn test_missing_repo_name_rejected() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/stats/prs/success-rate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
