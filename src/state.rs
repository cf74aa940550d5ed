//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::services::generator::ContentGenerator;
use crate::services::rate_limit::RateLimiter;
use crate::store::Store;

/// State shared across all routes via Axum's `State` extractor.
///
/// Store and generator are trait objects so tests (and database-less local
/// runs) can swap implementations without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub generator: Arc<dyn ContentGenerator>,
    pub limiter: Arc<RateLimiter>,
    pub admin_secret: String,
}
