//! Keyword Alchemist - Main Application Entry Point
//!
//! REST API server that turns keyword batches into AI-generated blog posts
//! under a credit-based access-key scheme, with an admin analytics surface.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Store**: PostgreSQL with sqlx, or in-memory when no DATABASE_URL
//! - **Generation**: Gemini API behind the `ContentGenerator` trait
//! - **Authentication**: access keys for processing, shared secret for admin
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Connect the store (running migrations when PostgreSQL-backed)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use keyword_alchemist::services::generator::GeminiGenerator;
use keyword_alchemist::services::rate_limit::RateLimiter;
use keyword_alchemist::state::AppState;
use keyword_alchemist::store::{Store, memory::MemoryStore, postgres::PgStore};
use keyword_alchemist::{build_router, config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect the store
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        store,
        generator: Arc::new(GeminiGenerator::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )),
        limiter: Arc::new(RateLimiter::new(config.generation_rate_per_sec, 1)),
        admin_secret: config.admin_secret.clone(),
    };

    let app = build_router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}
