//! Graph store access layer.
//!
//! [`GraphStore`] is the only component that talks to the database driver.
//! Its two executor entry points ([`GraphStore::read`] and
//! [`GraphStore::write`]) both demand an explicit [`crate::tenant::TenantId`]
//! and inject it into the bound parameter set under the fixed key
//! `tenant_id`, so a call site without a tenant context does not compile.
//!
//! The executor does not parse or rewrite query text.  Scoping correctness
//! is a contract on callers: every query string touching tenant-owned data
//! must filter on `$tenant_id`.

mod store;

pub use store::{GraphStore, TENANT_PARAM};

use serde_json::Value;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The executor was invoked without a usable tenant identifier.
    #[error("no tenant context supplied")]
    MissingTenant,

    /// Propagated from the SurrealDB driver.
    #[error("storage error: {0}")]
    Db(#[from] surrealdb::Error),

    /// A persistent database path was configured but the binary was built
    /// without the `rocksdb` feature.
    #[error("persistent storage unavailable for path {0}")]
    PersistenceUnavailable(String),
}

/// Ordered set of named query parameters.
///
/// Values are plain JSON so the service layer never handles driver types.
/// The executor appends the tenant binding itself; pushing a parameter named
/// `tenant_id` here would be overwritten by the injected one.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder-style.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Add a binding in place.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) {
        self.0.push((key.to_owned(), value.into()));
    }

    pub(crate) fn into_inner(self) -> Vec<(String, Value)> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn params_preserve_insertion_order() {
        let p = Params::new()
            .with("id", "m-1")
            .with("title", "t")
            .with("limit", 20);
        let inner = p.into_inner();
        assert_eq!(inner[0].0, "id");
        assert_eq!(inner[2].1, serde_json::json!(20));
    }
}
