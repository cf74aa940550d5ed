//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `ADMIN_SECRET` (required): shared secret protecting the admin surface
/// - `GEMINI_API_KEY` (required): key for the generation provider
/// - `DATABASE_URL` (optional): PostgreSQL connection string; when unset the
///   server runs against an in-memory store (local development only)
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `GEMINI_MODEL` (optional): provider model name
/// - `GENERATION_RATE_PER_SEC` (optional): upstream call pacing, defaults to 1
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub admin_secret: String,

    pub gemini_api_key: String,

    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_model")]
    pub gemini_model: String,

    #[serde(default = "default_rate")]
    pub generation_rate_per_sec: f64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// One call per second matches the provider's free-tier rate limit.
fn default_rate() -> f64 {
    1.0
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., ADMIN_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: admin_secret -> ADMIN_SECRET
        envy::from_env::<Config>()
    }
}
