//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Tenant-context middleware guarding every data route
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with
//!   `LORE_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route

mod characters;
pub mod doc;
mod health;
mod locations;
mod moments;

use axum::{Router, middleware};
use std::sync::Arc;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{auth, cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    // Every data route sits behind the tenant-context gate; only the health
    // check and API docs are reachable without one.
    let api = Router::new()
        .merge(moments::router())
        .merge(characters::router())
        .merge(locations::router())
        .layer(middleware::from_fn(auth::require_tenant));

    let mut app = Router::new().merge(health::router()).merge(api);

    if state.config.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()),
        );
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
