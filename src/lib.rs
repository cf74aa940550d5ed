//! Keyword Alchemist backend library.
//!
//! A credit-gated service that turns user-supplied keywords into
//! AI-generated blog posts. The library crate exposes the modules so
//! integration tests can drive the orchestrator and router directly; the
//! binary in `main.rs` only wires configuration and serves.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router.
///
/// Admin routes are grouped under the admin-secret middleware; everything
/// else authenticates (where it does at all) via the access key in the
/// request body.
pub fn build_router(state: AppState) -> Router {
    // Admin routes (shared-secret protected)
    let admin_routes = Router::new()
        .route("/api/v1/admin/keys", post(handlers::admin::create_key))
        .route(
            "/api/v1/admin/keys/{id}",
            delete(handlers::admin::revoke_key),
        )
        .route("/api/v1/admin/dashboard", get(handlers::admin::dashboard))
        .route(
            "/api/v1/purchases",
            post(handlers::admin::purchase_completed),
        )
        // Apply admin authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth,
        ));

    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/keys/validate", post(handlers::keys::validate_key))
        .route(
            "/api/v1/keywords/process",
            post(handlers::keywords::process_keywords),
        )
        .route(
            "/api/v1/articles/convert",
            post(handlers::articles::convert_article),
        )
        // Merge admin routes
        .merge(admin_routes)
        // Browser clients call this API cross-origin
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share application state with all handlers via State extraction
        .with_state(state)
}
