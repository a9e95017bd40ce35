//! Character endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use utoipa::OpenApi;

use crate::error::{AppJson, ServerError};
use crate::models::Data;
use crate::models::character::{
    CharacterResponse, CreateCharacterRequest, CreateRelationshipRequest, RelationshipResponse,
};
use crate::services::characters;
use crate::state::AppState;
use crate::tenant::TenantId;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_characters,
        create_character,
        get_character,
        delete_character,
        relate_characters,
        list_relationships,
    ),
    components(schemas(
        CreateCharacterRequest,
        CreateRelationshipRequest,
        CharacterResponse,
        RelationshipResponse,
    ))
)]
pub struct CharactersApi;

/// Register character routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/characters", get(list_characters).post(create_character))
        .route(
            "/characters/{id}",
            get(get_character).delete(delete_character),
        )
        .route("/characters/{id}/knows/{other_id}", post(relate_characters))
        .route("/characters/{id}/relationships", get(list_relationships))
}

#[utoipa::path(
    get,
    path = "/characters",
    tag = "characters",
    responses(
        (status = 200, description = "Characters, newest first", body = Vec<CharacterResponse>),
        (status = 401, description = "Missing tenant context"),
    )
)]
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
) -> Result<impl IntoResponse, ServerError> {
    let records = characters::list(&state.store, &tenant).await?;
    Ok(Json(Data { data: records }))
}

#[utoipa::path(
    post,
    path = "/characters",
    tag = "characters",
    request_body = CreateCharacterRequest,
    responses(
        (status = 201, description = "Character created", body = CharacterResponse),
        (status = 400, description = "Empty name or malformed body"),
    )
)]
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    AppJson(req): AppJson<CreateCharacterRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let record = characters::create(&state.store, &tenant, req).await?;
    Ok((StatusCode::CREATED, Json(Data { data: record })))
}

#[utoipa::path(
    get,
    path = "/characters/{id}",
    tag = "characters",
    responses(
        (status = 200, description = "Character record", body = CharacterResponse),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let record = characters::get(&state.store, &tenant, &id).await?;
    Ok(Json(Data { data: record }))
}

#[utoipa::path(
    delete,
    path = "/characters/{id}",
    tag = "characters",
    responses(
        (status = 200, description = "Character and its edges removed"),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    characters::delete(&state.store, &tenant, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "character deleted",
    })))
}

#[utoipa::path(
    post,
    path = "/characters/{id}/knows/{other_id}",
    tag = "characters",
    request_body = CreateRelationshipRequest,
    responses(
        (status = 201, description = "KNOWS edge created", body = RelationshipResponse),
        (status = 400, description = "Self-relationship or empty relationship_type"),
        (status = 404, description = "Either character missing within the tenant's scope"),
    )
)]
pub async fn relate_characters(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path((id, other_id)): Path<(String, String)>,
    AppJson(req): AppJson<CreateRelationshipRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let record = characters::relate(&state.store, &tenant, &id, &other_id, req).await?;
    Ok((StatusCode::CREATED, Json(Data { data: record })))
}

#[utoipa::path(
    get,
    path = "/characters/{id}/relationships",
    tag = "characters",
    responses(
        (status = 200, description = "KNOWS edges touching the character", body = Vec<RelationshipResponse>),
        (status = 404, description = "Not found within the tenant's scope"),
    )
)]
pub async fn list_relationships(
    State(state): State<Arc<AppState>>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let records = characters::relationships(&state.store, &tenant, &id).await?;
    Ok(Json(Data { data: records }))
}
