//! Moment records and wire schemas.
//!
//! A Moment is the narrative unit: title/content plus the derived `preview`
//! (capped at 300 characters).  Two read projections exist: `full` carries
//! `content` and linked Characters/Locations, `lightweight` drops `content`
//! entirely so list and timeline endpoints never load body text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EntityRef, fmt_ts};

/// Full Moment row as stored in the `moment` table.
#[derive(Debug, Clone, Deserialize)]
pub struct Moment {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub preview: String,
    /// Narrative-time marker; opaque to the server.
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lightweight Moment row: every attribute except `content`.
#[derive(Debug, Clone, Deserialize)]
pub struct MomentSummary {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub summary: Option<String>,
    pub preview: String,
    pub timestamp: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── wire schemas ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMomentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    /// Explicit preview; when omitted the first 300 characters of `content`
    /// are derived instead.
    pub preview: Option<String>,
    pub timestamp: Option<String>,
}

/// Sparse update: only the fields present in the body are touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMomentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub preview: Option<String>,
    pub timestamp: Option<String>,
}

impl UpdateMomentRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.summary.is_none()
            && self.preview.is_none()
            && self.timestamp.is_none()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MomentResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub preview: String,
    pub timestamp: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<EntityRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<EntityRef>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MomentSummaryResponse {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub preview: String,
    pub timestamp: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Moment {
    pub fn to_response(
        &self,
        characters: Option<Vec<EntityRef>>,
        locations: Option<Vec<EntityRef>>,
    ) -> MomentResponse {
        MomentResponse {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            summary: self.summary.clone(),
            preview: self.preview.clone(),
            timestamp: self.timestamp.clone(),
            created_at: fmt_ts(&self.created_at),
            updated_at: fmt_ts(&self.updated_at),
            characters,
            locations,
        }
    }
}

impl MomentSummary {
    pub fn to_response(&self) -> MomentSummaryResponse {
        MomentSummaryResponse {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            preview: self.preview.clone(),
            timestamp: self.timestamp.clone(),
            created_at: fmt_ts(&self.created_at),
            updated_at: fmt_ts(&self.updated_at),
        }
    }
}
