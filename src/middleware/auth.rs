//! Tenant-context middleware.
//!
//! Session/credential issuance lives in the upstream identity provider; by
//! the time a request reaches this server the tenant has been resolved and
//! forwarded as the `X-Tenant-Id` header.  This middleware turns that header
//! into a request-scoped [`TenantId`] extension, or rejects the request with
//! 401 before any handler logic runs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::tenant::{TenantId, X_TENANT_ID};

pub async fn require_tenant(mut req: Request<Body>, next: Next) -> Response {
    let tenant = req
        .headers()
        .get(X_TENANT_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(TenantId::new);

    match tenant {
        Some(tenant) => {
            req.extensions_mut().insert(tenant);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "missing tenant context" })),
        )
            .into_response(),
    }
}
