//! Character records, `KNOWS` relationship edges, and their wire schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fmt_ts;

/// Character row.  Owned independently of any Moment; deleting a Moment
/// never deletes a Character.
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// `KNOWS` edge row between two Characters.  Like every edge it carries its
/// own `tenant_id`; it is only created when both endpoints belong to the
/// same tenant as the edge.
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    pub tenant_id: String,
    pub from_id: String,
    pub to_id: String,
    pub relationship_type: String,
    pub context: Option<String>,
    pub since: DateTime<Utc>,
}

// ── wire schemas ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCharacterRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRelationshipRequest {
    pub relationship_type: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CharacterResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RelationshipResponse {
    pub from_id: String,
    pub to_id: String,
    pub relationship_type: String,
    pub context: Option<String>,
    pub since: String,
}

impl Character {
    pub fn to_response(&self) -> CharacterResponse {
        CharacterResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: fmt_ts(&self.created_at),
        }
    }
}

impl Relationship {
    pub fn to_response(&self) -> RelationshipResponse {
        RelationshipResponse {
            from_id: self.from_id.clone(),
            to_id: self.to_id.clone(),
            relationship_type: self.relationship_type.clone(),
            context: self.context.clone(),
            since: fmt_ts(&self.since),
        }
    }
}
