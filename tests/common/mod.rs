//! Shared harness: a full router over an embedded in-memory graph store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use lore_server::config::Config;
use lore_server::db::GraphStore;
use lore_server::routes;
use lore_server::state::AppState;

pub async fn test_app() -> Router {
    let cfg = Config {
        bind_address: "127.0.0.1:0".to_owned(),
        database_path: "memory".to_owned(),
        log_level: "info".to_owned(),
        log_json: false,
        cors_allowed_origins: None,
        enable_swagger: false,
    };
    let store = GraphStore::connect("memory")
        .await
        .expect("in-memory graph store");
    routes::build(Arc::new(AppState {
        config: Arc::new(cfg),
        store: Arc::new(store),
    }))
}

/// Issue a request and return `(status, parsed JSON body)`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = tenant {
        builder = builder.header("x-tenant-id", t);
    }
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, tenant: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(tenant), None).await
}

pub async fn post(app: &Router, uri: &str, tenant: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(tenant), Some(body)).await
}

pub async fn post_empty(app: &Router, uri: &str, tenant: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(tenant), None).await
}

pub async fn patch(app: &Router, uri: &str, tenant: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(tenant), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, tenant: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(tenant), None).await
}

/// Create a moment and return its id.
pub async fn create_moment(app: &Router, tenant: &str, body: Value) -> String {
    let (status, body) = post(app, "/moments", tenant, body).await;
    assert_eq!(status, StatusCode::CREATED, "create moment failed: {body}");
    body["data"]["id"]
        .as_str()
        .expect("moment id in response")
        .to_owned()
}

/// Create a character and return its id.
pub async fn create_character(app: &Router, tenant: &str, name: &str) -> String {
    let (status, body) = post(
        app,
        "/characters",
        tenant,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create character failed: {body}");
    body["data"]["id"]
        .as_str()
        .expect("character id in response")
        .to_owned()
}

/// Create a location and return its id.
pub async fn create_location(app: &Router, tenant: &str, name: &str) -> String {
    let (status, body) = post(
        app,
        "/locations",
        tenant,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create location failed: {body}");
    body["data"]["id"]
        .as_str()
        .expect("location id in response")
        .to_owned()
}
