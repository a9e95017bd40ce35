//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for lore-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Graph database location (default: `"memory"`).
    /// `"memory"` opens SurrealDB's embedded in-memory engine; any other
    /// value is treated as a RocksDB directory path and requires the
    /// `rocksdb` cargo feature.
    pub database_path: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve the Swagger UI at `/swagger-ui` (default: `true`).
    /// Disable in production to avoid exposing the API structure.
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("LORE_BIND", "0.0.0.0:3000"),
            database_path: env_or("LORE_DATABASE_PATH", "memory"),
            log_level: env_or("LORE_LOG", "info"),
            log_json: env_flag("LORE_LOG_JSON", false),
            cors_allowed_origins: std::env::var("LORE_CORS_ORIGINS").ok(),
            enable_swagger: env_flag("LORE_ENABLE_SWAGGER", true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
