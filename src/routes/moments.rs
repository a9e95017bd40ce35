//! Moment endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use utoipa::OpenApi;

use crate::error::{AppJson, AppQuery, ServerError};
use crate::models::Data;
use crate::models::moment::{
    CreateMomentRequest, MomentResponse, MomentSummaryResponse, UpdateMomentRequest,
};
use crate::services::moments;
use crate::state::AppState;
use crate::tenant::TenantId;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_moments,
        create_moment,
        get_timeline,
        get_moment,
        update_moment,
        delete_moment,
        link_after,
        unlink_after,
        link_character,
        unlink_character,
        link_location,
        unlink_location,
    ),
    components(schemas(
        CreateMomentRequest,
        UpdateMomentRequest,
        MomentResponse,
        MomentSummaryResponse,
    ))
)]
pub struct MomentsApi;

/// Register moment routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/moments", get(list_moments).post(create_moment))
        .route("/moments/timeline", get(get_timeline))
        .route(
            "/moments/{id}",
            get(get_moment).patch(update_moment).delete(delete_moment),
        )
        .route(
            "/moments/{id}/after/{next_id}",
            post(link_after).delete(unlink_after),
        )
        .route(
            "/moments/{id}/characters/{character_id}",
            post(link_character).delete(unlink_character),
        )
        .route(
            "/moments/{id}/locations/{location_id}",
            post(link_location).delete(unlink_location),
        )
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

// ── Moment handlers ───────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/moments",
    tag = "moments",
    responses(
        (status = 200, description = "Lightweight moment list, newest first", body = Vec<MomentSummaryResponse>),
        (status = 401, description = "Missing tenant context"),
    )
)]
pub async fn list_moments(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    AppQuery(q): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let records = moments::list(&state.store, &tenant, q.limit, q.skip).await?;
    Ok(Json(Data { data: records }))
}

#[utoipa::path(
    post,
    path = "/moments",
    tag = "moments",
    request_body = CreateMomentRequest,
    responses(
        (status = 201, description = "Moment created", body = MomentResponse),
        (status = 400, description = "Both title and content missing, or malformed body"),
        (status = 401, description = "Missing tenant context"),
    )
)]
pub async fn create_moment(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    AppJson(req): AppJson<CreateMomentRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let record = moments::create(&state.store, &tenant, req).await?;
    Ok((StatusCode::CREATED, Json(Data { data: record })))
}

#[utoipa::path(
    get,
    path = "/moments/timeline",
    tag = "moments",
    responses(
        (status = 200, description = "Lightweight records in AFTER-chain order", body = Vec<MomentSummaryResponse>),
        (status = 401, description = "Missing tenant context"),
    )
)]
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
) -> Result<impl IntoResponse, ServerError> {
    let records = moments::timeline(&state.store, &tenant).await?;
    Ok(Json(Data { data: records }))
}

#[utoipa::path(
    get,
    path = "/moments/{id}",
    tag = "moments",
    responses(
        (status = 200, description = "Moment record (full unless fields=lightweight)", body = MomentResponse),
        (status = 401, description = "Missing tenant context"),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn get_moment(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
    AppQuery(q): AppQuery<FieldsQuery>,
) -> Result<Response, ServerError> {
    // Any value other than "lightweight" falls back to the full projection.
    if q.fields.as_deref() == Some("lightweight") {
        let record = moments::get_lightweight(&state.store, &tenant, &id).await?;
        Ok(Json(Data { data: record }).into_response())
    } else {
        let record = moments::get_full(&state.store, &tenant, &id).await?;
        Ok(Json(Data { data: record }).into_response())
    }
}

#[utoipa::path(
    patch,
    path = "/moments/{id}",
    tag = "moments",
    request_body = UpdateMomentRequest,
    responses(
        (status = 200, description = "Updated full record", body = MomentResponse),
        (status = 400, description = "Malformed body or no fields to update"),
        (status = 401, description = "Missing tenant context"),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn update_moment(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateMomentRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let record = moments::update(&state.store, &tenant, &id, req).await?;
    Ok(Json(Data { data: record }))
}

#[utoipa::path(
    delete,
    path = "/moments/{id}",
    tag = "moments",
    responses(
        (status = 200, description = "Moment and its edges removed"),
        (status = 401, description = "Missing tenant context"),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn delete_moment(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    moments::delete(&state.store, &tenant, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "moment deleted",
    })))
}

// ── Chain-edge handlers ───────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/moments/{id}/after/{next_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Chain edge created (idempotent)"),
        (status = 400, description = "Self-link, fork, or cycle"),
        (status = 404, description = "Either endpoint missing within the tenant's scope"),
    )
)]
pub async fn link_after(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, next_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::link_after(&state.store, &tenant, &id, &next_id).await?;
    Ok(Json(json!({ "success": true, "message": "chain edge created" })))
}

#[utoipa::path(
    delete,
    path = "/moments/{id}/after/{next_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Chain edge removed (idempotent)"),
        (status = 404, description = "Source moment missing within the tenant's scope"),
    )
)]
pub async fn unlink_after(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, next_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::unlink_after(&state.store, &tenant, &id, &next_id).await?;
    Ok(Json(json!({ "success": true, "message": "chain edge removed" })))
}

// ── Character / location link handlers ────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/moments/{id}/characters/{character_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Character linked (idempotent)"),
        (status = 404, description = "Moment or character missing within the tenant's scope"),
    )
)]
pub async fn link_character(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, character_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::link_character(&state.store, &tenant, &id, &character_id).await?;
    Ok(Json(json!({ "success": true, "message": "character linked" })))
}

#[utoipa::path(
    delete,
    path = "/moments/{id}/characters/{character_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Character unlinked (idempotent)"),
        (status = 404, description = "Moment missing within the tenant's scope"),
    )
)]
pub async fn unlink_character(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, character_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::unlink_character(&state.store, &tenant, &id, &character_id).await?;
    Ok(Json(json!({ "success": true, "message": "character unlinked" })))
}

#[utoipa::path(
    post,
    path = "/moments/{id}/locations/{location_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Location linked (idempotent)"),
        (status = 404, description = "Moment or location missing within the tenant's scope"),
    )
)]
pub async fn link_location(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, location_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::link_location(&state.store, &tenant, &id, &location_id).await?;
    Ok(Json(json!({ "success": true, "message": "location linked" })))
}

#[utoipa::path(
    delete,
    path = "/moments/{id}/locations/{location_id}",
    tag = "moments",
    responses(
        (status = 200, description = "Location unlinked (idempotent)"),
        (status = 404, description = "Moment missing within the tenant's scope"),
    )
)]
pub async fn unlink_location(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, location_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    moments::unlink_location(&state.store, &tenant, &id, &location_id).await?;
    Ok(Json(json!({ "success": true, "message": "location unlinked" })))
}
