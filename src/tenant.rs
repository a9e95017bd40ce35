//! Request-scoped tenant identity.
//!
//! The upstream identity layer resolves the caller and forwards an opaque
//! tenant identifier in the `X-Tenant-Id` header.  [`TenantId`] is the
//! explicit value threaded through every service and store call — it is
//! never read from ambient/global state, so an un-scoped query cannot
//! compile.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ServerError;

/// Header carrying the opaque tenant identifier resolved upstream.
pub static X_TENANT_ID: &str = "x-tenant-id";

/// Opaque, non-blank tenant identifier.  All persisted nodes and edges are
/// partitioned by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Validate a raw header value.  Returns `None` for empty/blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extractor pulling the [`TenantId`] placed in request extensions by
/// [`crate::middleware::auth::require_tenant`].  Handlers that take this
/// parameter cannot run without a resolved tenant.
impl<S> FromRequestParts<S> for TenantId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantId>()
            .cloned()
            .ok_or_else(|| ServerError::Unauthorized("missing tenant context".to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_tenant_is_rejected() {
        assert!(TenantId::new("").is_none());
        assert!(TenantId::new("   ").is_none());
    }

    #[test]
    fn tenant_is_trimmed() {
        let t = TenantId::new("  tenant-a ").unwrap();
        assert_eq!(t.as_str(), "tenant-a");
    }
}
