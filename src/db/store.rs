//! SurrealDB-backed graph store with mandatory tenant scoping.
//!
//! Uses the embedded engines (`kv-mem` by default, `kv-rocksdb` behind the
//! `rocksdb` feature) so the full stack runs in-process for tests and local
//! development.  The driver is treated as a black box: run a parameterized
//! query, get back rows.

use serde::de::DeserializeOwned;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tracing::info;

use super::{Params, StoreError};
use crate::tenant::TenantId;

/// Fixed parameter key under which the tenant identifier is injected into
/// every query.  Query text references it as `$tenant_id`.
pub static TENANT_PARAM: &str = "tenant_id";

/// Table/index definitions, applied idempotently at connect time.
/// Node tables carry the entity id in the record id; edge tables hold plain
/// endpoint id strings.  Every row carries `tenant_id`.
static SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS moment SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS moment_tenant ON TABLE moment COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS character SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS character_tenant ON TABLE character COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS location SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS location_tenant ON TABLE location COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS after SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS after_tenant ON TABLE after COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS participated_in SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS participated_in_tenant ON TABLE participated_in COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS occurred_at SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS occurred_at_tenant ON TABLE occurred_at COLUMNS tenant_id;

    DEFINE TABLE IF NOT EXISTS knows SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS knows_tenant ON TABLE knows COLUMNS tenant_id;
";

/// Tenant-scoped graph store.  Cloneable handle over a pooled connection.
#[derive(Clone)]
pub struct GraphStore {
    db: Surreal<Db>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GraphStore")
    }
}

impl GraphStore {
    /// Open the database at `path` and apply the schema.
    ///
    /// `"memory"` selects the embedded in-memory engine; anything else is a
    /// RocksDB directory path (requires the `rocksdb` feature).
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let db = if path == "memory" {
            Surreal::new::<Mem>(()).await?
        } else {
            open_persistent(path).await?
        };
        db.use_ns("lore").use_db("graph").await?;
        db.query(SCHEMA).await?.check()?;
        info!(%path, "graph store ready");
        Ok(Self { db })
    }

    /// Execute `query` with `params` plus the injected `$tenant_id` binding.
    async fn run(
        &self,
        query: &str,
        params: Params,
        tenant: &TenantId,
    ) -> Result<surrealdb::Response, StoreError> {
        if tenant.as_str().trim().is_empty() {
            return Err(StoreError::MissingTenant);
        }
        let mut request = self.db.query(query.to_owned());
        for (key, value) in params.into_inner() {
            request = request.bind((key, value));
        }
        // Bound last so a caller-supplied parameter can never shadow it.
        request = request.bind((TENANT_PARAM.to_owned(), tenant.as_str().to_owned()));
        let response = request.await?;
        Ok(response.check()?)
    }

    /// Isolated read: runs a single SELECT statement scoped to `tenant` and
    /// returns its rows.
    pub async fn read<T: DeserializeOwned>(
        &self,
        query: &str,
        params: Params,
        tenant: &TenantId,
    ) -> Result<Vec<T>, StoreError> {
        let mut response = self.run(query, params, tenant).await?;
        Ok(response.take(0)?)
    }

    /// Isolated write: runs one or more mutation statements scoped to
    /// `tenant` as a single logical transaction.  Multi-statement query text
    /// must carry its own `BEGIN TRANSACTION; … COMMIT TRANSACTION;`
    /// markers; a failed statement leaves no partial state.
    pub async fn write(
        &self,
        query: &str,
        params: Params,
        tenant: &TenantId,
    ) -> Result<(), StoreError> {
        self.run(query, params, tenant).await?;
        Ok(())
    }

    /// Ownership gate: true iff exactly one `label` record with `id` exists
    /// inside `tenant`'s scope.  "Does not exist" and "belongs to another
    /// tenant" are indistinguishable to the caller.
    pub async fn verify_ownership(
        &self,
        label: &str,
        id: &str,
        tenant: &TenantId,
    ) -> Result<bool, StoreError> {
        let rows: Vec<serde_json::Value> = self
            .read(
                "SELECT record::id(id) AS id FROM type::table($label) \
                 WHERE record::id(id) = $id AND tenant_id = $tenant_id",
                Params::new().with("label", label).with("id", id),
                tenant,
            )
            .await?;
        Ok(rows.len() == 1)
    }
}

#[cfg(feature = "rocksdb")]
async fn open_persistent(path: &str) -> Result<Surreal<Db>, StoreError> {
    use surrealdb::engine::local::RocksDb;
    Ok(Surreal::new::<RocksDb>(path).await?)
}

#[cfg(not(feature = "rocksdb"))]
async fn open_persistent(path: &str) -> Result<Surreal<Db>, StoreError> {
    Err(StoreError::PersistenceUnavailable(path.to_owned()))
}
