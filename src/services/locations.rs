//! Location lifecycle.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::{GraphStore, Params};
use crate::error::ServerError;
use crate::models::fmt_ts;
use crate::models::location::{CreateLocationRequest, Location, LocationResponse};
use crate::tenant::TenantId;

const FIELDS: &str = "record::id(id) AS id, tenant_id, name, created_at";

pub async fn create(
    store: &GraphStore,
    tenant: &TenantId,
    req: CreateLocationRequest,
) -> Result<LocationResponse, ServerError> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest("name must not be empty".to_owned()));
    }

    let location = Location {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.as_str().to_owned(),
        name: req.name,
        created_at: Utc::now(),
    };
    store
        .write(
            "CREATE type::thing('location', $id) CONTENT { \
                tenant_id: $tenant_id, name: $name, created_at: $created_at \
             } RETURN NONE",
            Params::new()
                .with("id", location.id.clone())
                .with("name", location.name.clone())
                .with("created_at", fmt_ts(&location.created_at)),
            tenant,
        )
        .await?;

    info!(location_id = %location.id, "location created");
    Ok(location.to_response())
}

pub async fn get(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
) -> Result<LocationResponse, ServerError> {
    let rows: Vec<Location> = store
        .read(
            &format!(
                "SELECT {FIELDS} FROM location \
                 WHERE record::id(id) = $id AND tenant_id = $tenant_id"
            ),
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    rows.into_iter()
        .next()
        .map(|l| l.to_response())
        .ok_or_else(|| not_found(id))
}

pub async fn list(
    store: &GraphStore,
    tenant: &TenantId,
) -> Result<Vec<LocationResponse>, ServerError> {
    let rows: Vec<Location> = store
        .read(
            &format!(
                "SELECT {FIELDS} FROM location WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC"
            ),
            Params::new(),
            tenant,
        )
        .await?;
    Ok(rows.iter().map(Location::to_response).collect())
}

/// Delete a Location and its `occurred_at` edges; linked Moments stay intact.
pub async fn delete(store: &GraphStore, tenant: &TenantId, id: &str) -> Result<(), ServerError> {
    if !store.verify_ownership("location", id, tenant).await? {
        return Err(not_found(id));
    }
    store
        .write(
            "BEGIN TRANSACTION; \
             DELETE occurred_at WHERE tenant_id = $tenant_id AND location_id = $id; \
             DELETE location WHERE record::id(id) = $id AND tenant_id = $tenant_id; \
             COMMIT TRANSACTION;",
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    info!(location_id = %id, "location deleted");
    Ok(())
}

fn not_found(id: &str) -> ServerError {
    ServerError::NotFound(format!("location {id} not found"))
}
