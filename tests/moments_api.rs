//! Moment lifecycle over the HTTP surface: validation, projections,
//! pagination, sparse updates and the derived preview.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn create_rejects_blank_title_and_content() {
    let app = test_app().await;

    let (status, body) = post(&app, "/moments", "t1", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post(
        &app,
        "/moments",
        "t1",
        json!({ "title": "  ", "content": "\n\t " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_accepts_title_only_and_content_only() {
    let app = test_app().await;

    let (status, body) = post(&app, "/moments", "t1", json!({ "title": "T" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["content"], "");
    assert_eq!(body["data"]["preview"], "");

    let (status, body) = post(&app, "/moments", "t1", json!({ "content": "body" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["preview"], "body");
}

/// The concrete end-to-end scenario: long content, derived preview, sparse
/// title-only update, lightweight read, delete.
#[tokio::test]
async fn moment_lifecycle_scenario() {
    let app = test_app().await;
    let long = "A".repeat(500);

    let (status, body) = post(
        &app,
        "/moments",
        "t1",
        json!({ "title": "T", "content": long }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["preview"], "A".repeat(300));
    assert_eq!(body["data"]["content"], "A".repeat(500));
    let id = body["data"]["id"].as_str().unwrap().to_owned();

    // Title-only patch leaves content and preview untouched.
    let (status, body) = patch(&app, &format!("/moments/{id}"), "t1", json!({ "title": "T2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "T2");
    assert_eq!(body["data"]["content"], "A".repeat(500));
    assert_eq!(body["data"]["preview"], "A".repeat(300));

    // Lightweight projection has no content key at all.
    let (status, body) = get(&app, &format!("/moments/{id}?fields=lightweight"), "t1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("content").is_none());
    assert_eq!(body["data"]["preview"], "A".repeat(300));

    let (status, body) = delete(&app, &format!("/moments/{id}"), "t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get(&app, &format!("/moments/{id}"), "t1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn explicit_preview_wins_over_derivation() {
    let app = test_app().await;
    let (status, body) = post(
        &app,
        "/moments",
        "t1",
        json!({ "title": "T", "content": "B".repeat(400), "preview": "custom" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["preview"], "custom");
}

#[tokio::test]
async fn content_update_rederives_preview() {
    let app = test_app().await;
    let id = create_moment(&app, "t1", json!({ "content": "short" })).await;

    let (status, body) = patch(
        &app,
        &format!("/moments/{id}"),
        "t1",
        json!({ "content": "B".repeat(400) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["preview"], "B".repeat(300));

    // An explicit preview in the same call is not overwritten.
    let (status, body) = patch(
        &app,
        &format!("/moments/{id}"),
        "t1",
        json!({ "content": "C".repeat(400), "preview": "mine" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["preview"], "mine");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = test_app().await;
    let id = create_moment(&app, "t1", json!({ "title": "T" })).await;

    let (status, body) = patch(&app, &format!("/moments/{id}"), "t1", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no fields"));
}

#[tokio::test]
async fn update_touches_updated_at_but_never_created_at() {
    let app = test_app().await;
    let (_, body) = post(&app, "/moments", "t1", json!({ "title": "T" })).await;
    let id = body["data"]["id"].as_str().unwrap().to_owned();
    let created_at = body["data"]["created_at"].as_str().unwrap().to_owned();
    let updated_at = body["data"]["updated_at"].as_str().unwrap().to_owned();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let (status, body) = patch(&app, &format!("/moments/{id}"), "t1", json!({ "title": "T2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created_at"], created_at);
    // Timestamps are fixed-width RFC 3339, so string order is time order.
    assert!(body["data"]["updated_at"].as_str().unwrap() > updated_at.as_str());
}

#[tokio::test]
async fn full_projection_carries_empty_link_lists() {
    let app = test_app().await;
    let id = create_moment(&app, "t1", json!({ "title": "T" })).await;

    let (status, body) = get(&app, &format!("/moments/{id}"), "t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["characters"], json!([]));
    assert_eq!(body["data"]["locations"], json!([]));
}

#[tokio::test]
async fn list_applies_limit_skip_and_defaults() {
    let app = test_app().await;
    for i in 0..25 {
        create_moment(&app, "t1", json!({ "title": format!("m{i}") })).await;
    }

    // Default call behaves as limit=20, skip=0.
    let (status, body) = get(&app, "/moments", "t1").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 20);
    // Ordered by created_at descending (non-strict: same-millisecond ties).
    for pair in data.windows(2) {
        assert!(pair[0]["created_at"].as_str().unwrap() >= pair[1]["created_at"].as_str().unwrap());
    }
    // Lightweight projection only.
    assert!(data[0].get("content").is_none());

    let (_, body) = get(&app, "/moments?limit=10&skip=20", "t1").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (_, body) = get(&app, "/moments?limit=0", "t1").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = get(&app, "/moments?limit=-1", "t1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_query_string_yields_error_envelope() {
    let app = test_app().await;

    let (status, body) = get(&app, "/moments?limit=abc", "t1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("query string"));

    let (status, body) = get(&app, "/moments?skip=1.5", "t1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_yields_error_envelope() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/moments",
        Some("t1"),
        Some(serde_json::Value::String("not an object".to_owned())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_tenant_header_is_unauthorized() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/moments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/moments",
        None,
        Some(json!({ "title": "T" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Blank header values are treated the same as absent ones.
    let (status, _) = send(&app, Method::GET, "/moments", Some("  "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_tenant() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
