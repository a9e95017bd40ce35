//! Character lifecycle and `KNOWS` relationships.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::{GraphStore, Params};
use crate::error::ServerError;
use crate::models::character::{
    Character, CharacterResponse, CreateCharacterRequest, CreateRelationshipRequest, Relationship,
    RelationshipResponse,
};
use crate::models::fmt_ts;
use crate::tenant::TenantId;

const FIELDS: &str = "record::id(id) AS id, tenant_id, name, created_at";

pub async fn create(
    store: &GraphStore,
    tenant: &TenantId,
    req: CreateCharacterRequest,
) -> Result<CharacterResponse, ServerError> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest("name must not be empty".to_owned()));
    }

    let character = Character {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.as_str().to_owned(),
        name: req.name,
        created_at: Utc::now(),
    };
    store
        .write(
            "CREATE type::thing('character', $id) CONTENT { \
                tenant_id: $tenant_id, name: $name, created_at: $created_at \
             } RETURN NONE",
            Params::new()
                .with("id", character.id.clone())
                .with("name", character.name.clone())
                .with("created_at", fmt_ts(&character.created_at)),
            tenant,
        )
        .await?;

    info!(character_id = %character.id, "character created");
    Ok(character.to_response())
}

pub async fn get(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
) -> Result<CharacterResponse, ServerError> {
    let rows: Vec<Character> = store
        .read(
            &format!(
                "SELECT {FIELDS} FROM character \
                 WHERE record::id(id) = $id AND tenant_id = $tenant_id"
            ),
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    rows.into_iter()
        .next()
        .map(|c| c.to_response())
        .ok_or_else(|| not_found(id))
}

pub async fn list(
    store: &GraphStore,
    tenant: &TenantId,
) -> Result<Vec<CharacterResponse>, ServerError> {
    let rows: Vec<Character> = store
        .read(
            &format!(
                "SELECT {FIELDS} FROM character WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC"
            ),
            Params::new(),
            tenant,
        )
        .await?;
    Ok(rows.iter().map(Character::to_response).collect())
}

/// Delete a Character and its edges (`participated_in`, `knows`).  Moments
/// and other Characters it was linked to stay intact.
pub async fn delete(store: &GraphStore, tenant: &TenantId, id: &str) -> Result<(), ServerError> {
    if !store.verify_ownership("character", id, tenant).await? {
        return Err(not_found(id));
    }
    store
        .write(
            "BEGIN TRANSACTION; \
             DELETE participated_in WHERE tenant_id = $tenant_id AND character_id = $id; \
             DELETE knows WHERE tenant_id = $tenant_id \
                AND (from_id = $id OR to_id = $id); \
             DELETE character WHERE record::id(id) = $id AND tenant_id = $tenant_id; \
             COMMIT TRANSACTION;",
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    info!(character_id = %id, "character deleted");
    Ok(())
}

/// Record that `from_id` knows `other_id`.  Both endpoints must belong to
/// the requesting tenant; the edge carries the tenant id itself.
pub async fn relate(
    store: &GraphStore,
    tenant: &TenantId,
    from_id: &str,
    other_id: &str,
    req: CreateRelationshipRequest,
) -> Result<RelationshipResponse, ServerError> {
    if from_id == other_id {
        return Err(ServerError::BadRequest(
            "a character cannot know itself".to_owned(),
        ));
    }
    if req.relationship_type.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "relationship_type must not be empty".to_owned(),
        ));
    }
    if !store.verify_ownership("character", from_id, tenant).await? {
        return Err(not_found(from_id));
    }
    if !store.verify_ownership("character", other_id, tenant).await? {
        return Err(not_found(other_id));
    }

    let relationship = Relationship {
        tenant_id: tenant.as_str().to_owned(),
        from_id: from_id.to_owned(),
        to_id: other_id.to_owned(),
        relationship_type: req.relationship_type,
        context: req.context,
        since: Utc::now(),
    };
    store
        .write(
            "CREATE knows CONTENT { \
                tenant_id: $tenant_id, \
                from_id: $from_id, \
                to_id: $to_id, \
                relationship_type: $relationship_type, \
                context: $context, \
                since: $since \
             } RETURN NONE",
            Params::new()
                .with("from_id", relationship.from_id.clone())
                .with("to_id", relationship.to_id.clone())
                .with("relationship_type", relationship.relationship_type.clone())
                .with("context", relationship.context.clone())
                .with("since", fmt_ts(&relationship.since)),
            tenant,
        )
        .await?;

    Ok(relationship.to_response())
}

/// All `knows` edges touching the character, newest first.
pub async fn relationships(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
) -> Result<Vec<RelationshipResponse>, ServerError> {
    if !store.verify_ownership("character", id, tenant).await? {
        return Err(not_found(id));
    }
    let rows: Vec<Relationship> = store
        .read(
            "SELECT tenant_id, from_id, to_id, relationship_type, context, since \
             FROM knows WHERE tenant_id = $tenant_id \
             AND (from_id = $id OR to_id = $id) ORDER BY since DESC",
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    Ok(rows.iter().map(Relationship::to_response).collect())
}

fn not_found(id: &str) -> ServerError {
    ServerError::NotFound(format!("character {id} not found"))
}
