//! Location endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use utoipa::OpenApi;

use crate::error::{AppJson, ServerError};
use crate::models::Data;
use crate::models::location::{CreateLocationRequest, LocationResponse};
use crate::services::locations;
use crate::state::AppState;
use crate::tenant::TenantId;

#[derive(OpenApi)]
#[openapi(
    paths(list_locations, create_location, get_location, delete_location),
    components(schemas(CreateLocationRequest, LocationResponse))
)]
pub struct LocationsApi;

/// Register location routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/{id}", get(get_location).delete(delete_location))
}

#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    responses(
        (status = 200, description = "Locations, newest first", body = Vec<LocationResponse>),
        (status = 401, description = "Missing tenant context"),
    )
)]
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
) -> Result<impl IntoResponse, ServerError> {
    let records = locations::list(&state.store, &tenant).await?;
    Ok(Json(Data { data: records }))
}

#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Empty name or malformed body"),
    )
)]
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    AppJson(req): AppJson<CreateLocationRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let record = locations::create(&state.store, &tenant, req).await?;
    Ok((StatusCode::CREATED, Json(Data { data: record })))
}

#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "locations",
    responses(
        (status = 200, description = "Location record", body = LocationResponse),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let record = locations::get(&state.store, &tenant, &id).await?;
    Ok(Json(Data { data: record }))
}

#[utoipa::path(
    delete,
    path = "/locations/{id}",
    tag = "locations",
    responses(
        (status = 200, description = "Location and its edges removed"),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    locations::delete(&state.store, &tenant, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "location deleted",
    })))
}
