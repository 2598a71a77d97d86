//! Integration test for the health check endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_ok_with_version() {
    let app = common::build_test_app(&[]);

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
