//! Moment lifecycle: create, read projections, sparse update, detach-delete
//! and timeline traversal.
//!
//! Every mutation is gated on [`crate::db::GraphStore::verify_ownership`],
//! and every statement filters on the injected `$tenant_id`, so a Moment is
//! never visible to, or mutable by, another tenant.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{GraphStore, Params};
use crate::error::ServerError;
use crate::models::moment::{
    CreateMomentRequest, Moment, MomentResponse, MomentSummary, MomentSummaryResponse,
    UpdateMomentRequest,
};
use crate::models::{EntityRef, fmt_ts};
use crate::services::preview::derive_preview;
use crate::tenant::TenantId;

/// Default page size for [`list`].
pub const DEFAULT_LIMIT: i64 = 20;

const FULL_FIELDS: &str = "record::id(id) AS id, tenant_id, title, content, summary, \
                           preview, timestamp, created_at, updated_at";
const SUMMARY_FIELDS: &str = "record::id(id) AS id, tenant_id, title, summary, \
                              preview, timestamp, created_at, updated_at";

/// `AFTER` edge row used by the timeline walk.
#[derive(Debug, Deserialize)]
struct ChainEdge {
    from_id: String,
    to_id: String,
}

// ── create ───────────────────────────────────────────────────────────────────

pub async fn create(
    store: &GraphStore,
    tenant: &TenantId,
    req: CreateMomentRequest,
) -> Result<MomentResponse, ServerError> {
    let title = req.title.unwrap_or_default();
    let content = req.content.unwrap_or_default();
    if title.trim().is_empty() && content.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "either title or content must be provided".to_owned(),
        ));
    }

    // User-supplied previews are capped at the same 300 characters as
    // derived ones.
    let preview = match req.preview {
        Some(p) => derive_preview(&p),
        None => derive_preview(&content),
    };

    let now = Utc::now();
    let moment = Moment {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.as_str().to_owned(),
        title,
        content,
        summary: req.summary,
        preview,
        timestamp: req.timestamp,
        created_at: now,
        updated_at: now,
    };

    store
        .write(
            "CREATE type::thing('moment', $id) CONTENT { \
                tenant_id: $tenant_id, \
                title: $title, \
                content: $content, \
                summary: $summary, \
                preview: $preview, \
                timestamp: $timestamp, \
                created_at: $created_at, \
                updated_at: $updated_at \
             } RETURN NONE",
            Params::new()
                .with("id", moment.id.clone())
                .with("title", moment.title.clone())
                .with("content", moment.content.clone())
                .with("summary", moment.summary.clone())
                .with("preview", moment.preview.clone())
                .with("timestamp", moment.timestamp.clone())
                .with("created_at", fmt_ts(&moment.created_at))
                .with("updated_at", fmt_ts(&moment.updated_at)),
            tenant,
        )
        .await?;

    info!(moment_id = %moment.id, "moment created");
    Ok(moment.to_response(None, None))
}

// ── read projections ─────────────────────────────────────────────────────────

/// Full projection: all attributes plus linked Characters and Locations.
pub async fn get_full(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
) -> Result<MomentResponse, ServerError> {
    let rows: Vec<Moment> = store
        .read(
            &format!(
                "SELECT {FULL_FIELDS} FROM moment \
                 WHERE record::id(id) = $id AND tenant_id = $tenant_id"
            ),
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    let moment = rows
        .into_iter()
        .next()
        .ok_or_else(|| not_found(id))?;

    let characters: Vec<EntityRef> = store
        .read(
            "SELECT record::id(id) AS id, name FROM character \
             WHERE tenant_id = $tenant_id AND record::id(id) IN \
               (SELECT VALUE character_id FROM participated_in \
                WHERE tenant_id = $tenant_id AND moment_id = $moment_id)",
            Params::new().with("moment_id", id),
            tenant,
        )
        .await?;
    let locations: Vec<EntityRef> = store
        .read(
            "SELECT record::id(id) AS id, name FROM location \
             WHERE tenant_id = $tenant_id AND record::id(id) IN \
               (SELECT VALUE location_id FROM occurred_at \
                WHERE tenant_id = $tenant_id AND moment_id = $moment_id)",
            Params::new().with("moment_id", id),
            tenant,
        )
        .await?;

    Ok(moment.to_response(Some(characters), Some(locations)))
}

/// Lightweight projection: all attributes except `content`, no link lookup.
pub async fn get_lightweight(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
) -> Result<MomentSummaryResponse, ServerError> {
    let rows: Vec<MomentSummary> = store
        .read(
            &format!(
                "SELECT {SUMMARY_FIELDS} FROM moment \
                 WHERE record::id(id) = $id AND tenant_id = $tenant_id"
            ),
            Params::new().with("id", id),
            tenant,
        )
        .await?;
    rows.into_iter()
        .next()
        .map(|m| m.to_response())
        .ok_or_else(|| not_found(id))
}

pub async fn list(
    store: &GraphStore,
    tenant: &TenantId,
    limit: Option<i64>,
    skip: Option<i64>,
) -> Result<Vec<MomentSummaryResponse>, ServerError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let skip = skip.unwrap_or(0);
    if limit < 0 || skip < 0 {
        return Err(ServerError::BadRequest(
            "limit and skip must be non-negative".to_owned(),
        ));
    }

    let rows: Vec<MomentSummary> = store
        .read(
            &format!(
                "SELECT {SUMMARY_FIELDS} FROM moment WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC LIMIT $limit START $skip"
            ),
            Params::new().with("limit", limit).with("skip", skip),
            tenant,
        )
        .await?;
    Ok(rows.iter().map(MomentSummary::to_response).collect())
}

// ── update ───────────────────────────────────────────────────────────────────

/// Accumulates `(field, placeholder, value)` triples for the subset of
/// present input fields, then renders the final statement.  Keeps the sparse
/// update free of any value interpolation into query text.
pub(crate) struct UpdateBuilder {
    assignments: Vec<String>,
    params: Params,
}

impl UpdateBuilder {
    pub(crate) fn new() -> Self {
        Self {
            assignments: Vec::new(),
            params: Params::new(),
        }
    }

    pub(crate) fn set(&mut self, field: &'static str, value: impl Into<Value>) {
        self.assignments.push(format!("{field} = ${field}"));
        self.params.push(field, value);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Render an UPDATE scoped by record id and tenant.  The `$id` binding
    /// is appended here; `$tenant_id` comes from the executor.
    pub(crate) fn render(mut self, table: &str, id: &str) -> (String, Params) {
        let query = format!(
            "UPDATE {table} SET {} \
             WHERE record::id(id) = $id AND tenant_id = $tenant_id RETURN NONE",
            self.assignments.join(", ")
        );
        self.params.push("id", id);
        (query, self.params)
    }
}

pub async fn update(
    store: &GraphStore,
    tenant: &TenantId,
    id: &str,
    req: UpdateMomentRequest,
) -> Result<MomentResponse, ServerError> {
    if req.is_empty() {
        return Err(ServerError::BadRequest("no fields to update".to_owned()));
    }
    if !store.verify_ownership("moment", id, tenant).await? {
        return Err(not_found(id));
    }

    let mut builder = UpdateBuilder::new();
    if let Some(title) = &req.title {
        builder.set("title", title.clone());
    }
    if let Some(content) = &req.content {
        builder.set("content", content.clone());
    }
    if let Some(summary) = &req.summary {
        builder.set("summary", summary.clone());
    }
    // An explicit preview wins; otherwise a content change re-derives it.
    match (&req.preview, &req.content) {
        (Some(preview), _) => builder.set("preview", derive_preview(preview)),
        (None, Some(content)) => builder.set("preview", derive_preview(content)),
        (None, None) => {}
    }
    if let Some(timestamp) = &req.timestamp {
        builder.set("timestamp", timestamp.clone());
    }
    // The implicit touch; `created_at` is never written after creation.
    builder.set("updated_at", fmt_ts(&Utc::now()));

    let (query, params) = builder.render("moment", id);
    store.write(&query, params, tenant).await?;

    get_full(store, tenant, id).await
}

// ── delete ───────────────────────────────────────────────────────────────────

/// Removes the Moment and every edge attached to it in one transaction.
/// Linked Characters, Locations and neighbouring Moments are left intact.
pub async fn delete(store: &GraphStore, tenant: &TenantId, id: &str) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", id, tenant).await? {
        return Err(not_found(id));
    }

    store
        .write(
            "BEGIN TRANSACTION; \
             DELETE after WHERE tenant_id = $tenant_id \
                AND (from_id = $id OR to_id = $id); \
             DELETE participated_in WHERE tenant_id = $tenant_id AND moment_id = $id; \
             DELETE occurred_at WHERE tenant_id = $tenant_id AND moment_id = $id; \
             DELETE moment WHERE record::id(id) = $id AND tenant_id = $tenant_id; \
             COMMIT TRANSACTION;",
            Params::new().with("id", id),
            tenant,
        )
        .await?;

    info!(moment_id = %id, "moment deleted");
    Ok(())
}

// ── timeline ─────────────────────────────────────────────────────────────────

/// Ordered lightweight records following the `AFTER` chain from its head.
///
/// Zero or multiple heads is a data-integrity condition the service does not
/// repair: the chain is treated as a forest, heads visited in `created_at`
/// ascending order with their chains concatenated, and the anomaly logged.
pub async fn timeline(
    store: &GraphStore,
    tenant: &TenantId,
) -> Result<Vec<MomentSummaryResponse>, ServerError> {
    let moments: Vec<MomentSummary> = store
        .read(
            &format!(
                "SELECT {SUMMARY_FIELDS} FROM moment WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC"
            ),
            Params::new(),
            tenant,
        )
        .await?;
    let edges: Vec<ChainEdge> = store
        .read(
            "SELECT from_id, to_id FROM after WHERE tenant_id = $tenant_id",
            Params::new(),
            tenant,
        )
        .await?;

    let by_id: HashMap<&str, &MomentSummary> =
        moments.iter().map(|m| (m.id.as_str(), m)).collect();
    let next: HashMap<&str, &str> = edges
        .iter()
        .map(|e| (e.from_id.as_str(), e.to_id.as_str()))
        .collect();
    let has_incoming: HashSet<&str> = edges.iter().map(|e| e.to_id.as_str()).collect();

    let heads: Vec<&str> = moments
        .iter()
        .map(|m| m.id.as_str())
        .filter(|id| !has_incoming.contains(id))
        .collect();
    if heads.len() != 1 && !moments.is_empty() {
        warn!(
            head_count = heads.len(),
            moment_count = moments.len(),
            "timeline chain does not have exactly one head"
        );
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(moments.len());
    for head in heads {
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                break;
            }
            match by_id.get(id) {
                Some(m) => ordered.push(m.to_response()),
                None => break,
            }
            cursor = next.get(id).copied();
        }
    }
    Ok(ordered)
}

// ── chain edges ──────────────────────────────────────────────────────────────

/// Create the `AFTER` edge `from_id → to_id`.  Re-linking an existing pair
/// is a no-op; a link that would fork the chain or close a cycle is
/// rejected, since the timeline is a singly-linked acyclic order.
pub async fn link_after(
    store: &GraphStore,
    tenant: &TenantId,
    from_id: &str,
    to_id: &str,
) -> Result<(), ServerError> {
    if from_id == to_id {
        return Err(ServerError::BadRequest(
            "a moment cannot follow itself".to_owned(),
        ));
    }
    if !store.verify_ownership("moment", from_id, tenant).await? {
        return Err(not_found(from_id));
    }
    if !store.verify_ownership("moment", to_id, tenant).await? {
        return Err(not_found(to_id));
    }

    let edges: Vec<ChainEdge> = store
        .read(
            "SELECT from_id, to_id FROM after WHERE tenant_id = $tenant_id",
            Params::new(),
            tenant,
        )
        .await?;
    if edges
        .iter()
        .any(|e| e.from_id == from_id && e.to_id == to_id)
    {
        return Ok(());
    }
    if edges.iter().any(|e| e.from_id == from_id) {
        return Err(ServerError::BadRequest(
            "moment already has a successor".to_owned(),
        ));
    }
    if edges.iter().any(|e| e.to_id == to_id) {
        return Err(ServerError::BadRequest(
            "moment already has a predecessor".to_owned(),
        ));
    }
    // Walking forward from the target must never reach the source.
    let next: HashMap<&str, &str> = edges
        .iter()
        .map(|e| (e.from_id.as_str(), e.to_id.as_str()))
        .collect();
    let mut cursor = Some(to_id);
    let mut hops = 0usize;
    while let Some(id) = cursor {
        if id == from_id {
            return Err(ServerError::BadRequest(
                "link would create a cycle in the timeline".to_owned(),
            ));
        }
        cursor = next.get(id).copied();
        hops += 1;
        if hops > edges.len() + 1 {
            break;
        }
    }

    store
        .write(
            "CREATE after CONTENT { \
                tenant_id: $tenant_id, from_id: $from_id, to_id: $to_id \
             } RETURN NONE",
            Params::new().with("from_id", from_id).with("to_id", to_id),
            tenant,
        )
        .await?;
    Ok(())
}

/// Sever the `AFTER` edge `from_id → to_id`.  Idempotent.
pub async fn unlink_after(
    store: &GraphStore,
    tenant: &TenantId,
    from_id: &str,
    to_id: &str,
) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", from_id, tenant).await? {
        return Err(not_found(from_id));
    }
    store
        .write(
            "DELETE after WHERE tenant_id = $tenant_id \
             AND from_id = $from_id AND to_id = $to_id",
            Params::new().with("from_id", from_id).with("to_id", to_id),
            tenant,
        )
        .await?;
    Ok(())
}

// ── character / location links ───────────────────────────────────────────────

pub async fn link_character(
    store: &GraphStore,
    tenant: &TenantId,
    moment_id: &str,
    character_id: &str,
) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", moment_id, tenant).await? {
        return Err(not_found(moment_id));
    }
    if !store
        .verify_ownership("character", character_id, tenant)
        .await?
    {
        return Err(ServerError::NotFound(format!(
            "character {character_id} not found"
        )));
    }
    link_edge(
        store,
        tenant,
        "participated_in",
        "character_id",
        character_id,
        moment_id,
    )
    .await
}

pub async fn unlink_character(
    store: &GraphStore,
    tenant: &TenantId,
    moment_id: &str,
    character_id: &str,
) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", moment_id, tenant).await? {
        return Err(not_found(moment_id));
    }
    store
        .write(
            "DELETE participated_in WHERE tenant_id = $tenant_id \
             AND moment_id = $moment_id AND character_id = $entity_id",
            Params::new()
                .with("moment_id", moment_id)
                .with("entity_id", character_id),
            tenant,
        )
        .await?;
    Ok(())
}

pub async fn link_location(
    store: &GraphStore,
    tenant: &TenantId,
    moment_id: &str,
    location_id: &str,
) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", moment_id, tenant).await? {
        return Err(not_found(moment_id));
    }
    if !store
        .verify_ownership("location", location_id, tenant)
        .await?
    {
        return Err(ServerError::NotFound(format!(
            "location {location_id} not found"
        )));
    }
    link_edge(
        store,
        tenant,
        "occurred_at",
        "location_id",
        location_id,
        moment_id,
    )
    .await
}

pub async fn unlink_location(
    store: &GraphStore,
    tenant: &TenantId,
    moment_id: &str,
    location_id: &str,
) -> Result<(), ServerError> {
    if !store.verify_ownership("moment", moment_id, tenant).await? {
        return Err(not_found(moment_id));
    }
    store
        .write(
            "DELETE occurred_at WHERE tenant_id = $tenant_id \
             AND moment_id = $moment_id AND location_id = $entity_id",
            Params::new()
                .with("moment_id", moment_id)
                .with("entity_id", location_id),
            tenant,
        )
        .await?;
    Ok(())
}

/// Idempotent non-owning link edge between an entity and a moment.
async fn link_edge(
    store: &GraphStore,
    tenant: &TenantId,
    table: &str,
    entity_field: &str,
    entity_id: &str,
    moment_id: &str,
) -> Result<(), ServerError> {
    let existing: Vec<Value> = store
        .read(
            &format!(
                "SELECT moment_id FROM {table} WHERE tenant_id = $tenant_id \
                 AND moment_id = $moment_id AND {entity_field} = $entity_id"
            ),
            Params::new()
                .with("moment_id", moment_id)
                .with("entity_id", entity_id),
            tenant,
        )
        .await?;
    if !existing.is_empty() {
        return Ok(());
    }
    store
        .write(
            &format!(
                "CREATE {table} CONTENT {{ \
                    tenant_id: $tenant_id, \
                    moment_id: $moment_id, \
                    {entity_field}: $entity_id \
                 }} RETURN NONE"
            ),
            Params::new()
                .with("moment_id", moment_id)
                .with("entity_id", entity_id),
            tenant,
        )
        .await?;
    Ok(())
}

fn not_found(id: &str) -> ServerError {
    ServerError::NotFound(format!("moment {id} not found"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_renders_only_present_fields() {
        let mut b = UpdateBuilder::new();
        b.set("title", "T2");
        b.set("updated_at", "2026-01-01T00:00:00.000Z");
        let (query, params) = b.render("moment", "m-1");
        assert!(query.contains("SET title = $title, updated_at = $updated_at"));
        assert!(!query.contains("content"));
        assert!(query.contains("WHERE record::id(id) = $id AND tenant_id = $tenant_id"));
        let keys: Vec<String> = params.into_inner().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "updated_at", "id"]);
    }

    #[test]
    fn builder_starts_empty() {
        assert!(UpdateBuilder::new().is_empty());
    }
}
