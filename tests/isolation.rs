//! Tenant-isolation guarantees: no tenant can read, traverse or mutate
//! another tenant's data, and the failure mode never reveals existence.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn cross_tenant_reads_and_mutations_are_not_found() {
    let app = test_app().await;
    let id = create_moment(&app, "t1", json!({ "title": "secret" })).await;

    // Reads.
    let (status, body) = get(&app, &format!("/moments/{id}"), "t2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    let (status, _) = get(&app, &format!("/moments/{id}?fields=lightweight"), "t2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Mutations.
    let (status, _) = patch(&app, &format!("/moments/{id}"), "t2", json!({ "title": "stolen" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &format!("/moments/{id}"), "t2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner still sees the record, untouched.
    let (status, body) = get(&app, &format!("/moments/{id}"), "t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "secret");
}

#[tokio::test]
async fn cross_tenant_error_matches_missing_entity_error() {
    let app = test_app().await;
    let id = create_moment(&app, "t1", json!({ "title": "T" })).await;

    let (foreign_status, foreign_body) = get(&app, &format!("/moments/{id}"), "t2").await;
    let (missing_status, missing_body) = get(&app, "/moments/does-not-exist", "t2").await;

    // Identical status and identical error shape for both cases.
    assert_eq!(foreign_status, missing_status);
    assert_eq!(
        foreign_body["error"].as_str().unwrap().replace(&id, "does-not-exist"),
        missing_body["error"].as_str().unwrap()
    );
}

#[tokio::test]
async fn list_and_timeline_are_tenant_scoped() {
    let app = test_app().await;
    create_moment(&app, "t1", json!({ "title": "a" })).await;
    create_moment(&app, "t1", json!({ "title": "b" })).await;
    create_moment(&app, "t2", json!({ "title": "c" })).await;

    let (_, body) = get(&app, "/moments", "t2").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "c");

    let (_, body) = get(&app, "/moments/timeline", "t2").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/moments", "t3").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cross_tenant_links_are_rejected() {
    let app = test_app().await;
    let moment = create_moment(&app, "t1", json!({ "title": "T" })).await;
    let character = create_character(&app, "t2", "Ava").await;

    // t2 cannot link through t1's moment.
    let (status, _) = post_empty(&app, &format!("/moments/{moment}/characters/{character}"), "t2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // t1 cannot link t2's character either.
    let (status, _) = post_empty(&app, &format!("/moments/{moment}/characters/{character}"), "t1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Chain edges across tenants fail the same way.
    let other = create_moment(&app, "t2", json!({ "title": "U" })).await;
    let (status, _) = post_empty(&app, &format!("/moments/{moment}/after/{other}"), "t1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cross_tenant_relationships_are_rejected() {
    let app = test_app().await;
    let mine = create_character(&app, "t1", "Ava").await;
    let theirs = create_character(&app, "t2", "Brin").await;

    let (status, _) = post(
        &app,
        &format!("/characters/{mine}/knows/{theirs}"),
        "t1",
        json!({ "relationship_type": "ally" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_creates_yield_distinct_ids() {
    let app = test_app().await;

    let creates = (0..10).map(|i| {
        let app = app.clone();
        async move {
            let (status, body) = post(
                &app,
                "/moments",
                "t1",
                json!({ "title": format!("m{i}") }),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            body["data"]["id"].as_str().unwrap().to_owned()
        }
    });
    let ids = futures::future::join_all(creates).await;

    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}
