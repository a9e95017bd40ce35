//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** Internal errors (Database, Internal) are logged with
//! full detail but only a generic message is returned to the caller so that
//! connection strings, query text, or other implementation details never
//! leak to clients.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

/// All errors that can occur in the lore-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// No tenant context could be resolved for the request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller referenced an entity that does not exist *within the
    /// caller's tenant scope*.  A cross-tenant id produces this same error
    /// so existence never leaks across tenants.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Propagated from the graph store driver.
    #[error("storage error: {0}")]
    Database(#[from] surrealdb::Error),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),

            // Internal errors: log the full detail, return a generic message.
            ServerError::Database(e) => {
                error!(error = %e, "graph store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingTenant => {
                ServerError::Unauthorized("missing tenant context".to_owned())
            }
            StoreError::Db(e) => ServerError::Database(e),
            StoreError::PersistenceUnavailable(path) => ServerError::Internal(format!(
                "persistent storage at {path} requires the rocksdb feature"
            )),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

/// JSON extractor whose rejection is reported through the shared `{error}`
/// envelope instead of axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = ServerError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(ServerError::BadRequest(match rejection {
                JsonRejection::JsonDataError(e) => format!("malformed request body: {e}"),
                JsonRejection::JsonSyntaxError(e) => format!("malformed request body: {e}"),
                JsonRejection::MissingJsonContentType(_) => {
                    "expected content-type: application/json".to_owned()
                }
                other => other.body_text(),
            })),
        }
    }
}

/// Query-string extractor whose rejection is reported through the shared
/// `{error}` envelope instead of axum's plain-text default.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(ServerError::BadRequest(format!(
                "malformed query string: {}",
                rejection.body_text()
            ))),
        }
    }
}
