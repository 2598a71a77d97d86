//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use fategm_api::routes;
use fategm_api::state::AppState;
use fategm_core::clock::Clock;
use fategm_notify::NotificationHub;
use fategm_test_support::{
    FixedClock, InMemoryHistoryRepository, InMemoryRoundRepository,
    InMemorySubmissionRepository, StaticCampaignDirectory,
};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router on in-memory repositories, knowing exactly the
/// given campaigns. Uses the same route structure as `main.rs`. The router
/// is cheap to clone and every clone shares the same state.
pub fn build_test_app(known_campaigns: &[Uuid]) -> Router {
    let app_state = AppState::new(
        fixed_clock(),
        Arc::new(StaticCampaignDirectory::with_campaigns(
            known_campaigns.iter().copied(),
        )),
        Arc::new(InMemoryRoundRepository::new()),
        Arc::new(InMemorySubmissionRepository::new()),
        Arc::new(InMemoryHistoryRepository::new()),
        NotificationHub::new(),
    );

    Router::new()
        .merge(routes::health::router())
        .nest("/api/action-submissions", routes::submissions::router())
        .nest("/api/rounds", routes::rounds::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
