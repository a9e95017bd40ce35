//! Location records and wire schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fmt_ts;

/// Location row.  Owned independently of any Moment.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl Location {
    pub fn to_response(&self) -> LocationResponse {
        LocationResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: fmt_ts(&self.created_at),
        }
    }
}
