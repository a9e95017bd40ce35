//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::db::GraphStore;

/// State shared across all HTTP handlers.
///
/// The graph store handle is the only shared mutable resource; it pools its
/// own connections and is safe for concurrent use.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Tenant-scoped graph store.
    pub store: Arc<GraphStore>,
}
