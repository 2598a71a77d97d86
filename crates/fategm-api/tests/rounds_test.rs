//! Integration tests for the round lifecycle endpoints.

mod common;

use axum::http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_current_creates_then_reuses_the_open_round() {
    let campaign_id = Uuid::new_v4();
    let app = common::build_test_app(&[campaign_id]);

    let (status, first) = common::get_json(
        app.clone(),
        &format!("/api/rounds/current?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["round"]["turnNumber"], 1);
    assert_eq!(first["round"]["status"], "OPEN");

    let (status, second) = common::get_json(
        app,
        &format!("/api/rounds/current?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["round"]["id"], first["round"]["id"]);
}

#[tokio::test]
async fn test_next_advances_even_while_a_round_is_open() {
    let campaign_id = Uuid::new_v4();
    let app = common::build_test_app(&[campaign_id]);

    common::get_json(
        app.clone(),
        &format!("/api/rounds/current?campaignId={campaign_id}"),
    )
    .await;

    let (status, json) = common::post_empty(
        app.clone(),
        &format!("/api/rounds/next?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["round"]["turnNumber"], 2);
    assert_eq!(json["round"]["status"], "OPEN");

    // The previous round was implicitly closed: closing now fails only
    // after closing the new one too.
    let (status, _) = common::post_empty(
        app.clone(),
        &format!("/api/rounds/close-current?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = common::post_empty(
        app,
        &format!("/api/rounds/close-current?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_state");
}

#[tokio::test]
async fn test_close_current_with_partial_payload_archives_what_was_sent() {
    let campaign_id = Uuid::new_v4();
    let app = common::build_test_app(&[campaign_id]);

    common::get_json(
        app.clone(),
        &format!("/api/rounds/current?campaignId={campaign_id}"),
    )
    .await;

    let payload = serde_json::json!({
        "actionOrder": ["弓", "剣"],
        "servantActions": [{"class": "弓", "content": "attack"}],
    });
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/rounds/close-current?campaignId={campaign_id}"),
        &payload,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["round"]["status"], "CLOSED");
    assert_eq!(json["history"]["turnNumber"], 1);
    assert_eq!(json["history"]["actionOrder"], serde_json::json!(["弓", "剣"]));
    assert!(json["history"]["masterActions"].is_null());
    assert_eq!(json["history"]["closedAt"], json["round"]["closedAt"]);

    let (status, listed) = common::get_json(
        app,
        &format!("/api/rounds/history?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_is_ordered_latest_round_first() {
    let campaign_id = Uuid::new_v4();
    let app = common::build_test_app(&[campaign_id]);

    for _ in 0..3 {
        common::get_json(
            app.clone(),
            &format!("/api/rounds/current?campaignId={campaign_id}"),
        )
        .await;
        common::post_json(
            app.clone(),
            &format!("/api/rounds/close-current?campaignId={campaign_id}"),
            &serde_json::json!({ "actionOrder": ["弓"] }),
        )
        .await;
    }

    let (status, json) = common::get_json(
        app,
        &format!("/api/rounds/history?campaignId={campaign_id}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let turns: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["turnNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(turns, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_round_endpoints_reject_unknown_campaigns() {
    let app = common::build_test_app(&[]);
    let campaign_id = Uuid::new_v4();

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/rounds/current?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "campaign_not_found");

    let (status, json) = common::post_empty(
        app,
        &format!("/api/rounds/next?campaignId={campaign_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "campaign_not_found");
}
