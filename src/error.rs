//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from store operations
/// - **Authentication Errors**: Invalid access key or admin secret
/// - **Precondition Errors**: Insufficient credits (rejects a whole batch)
/// - **Generation Errors**: Upstream provider failure or unusable content;
///   scoped to a single approach attempt and captured by the orchestrator
///   rather than propagated to the caller
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Store operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Access key is unknown, revoked, or otherwise unusable.
    ///
    /// Returns HTTP 401 Unauthorized. A batch presenting a bad key is
    /// rejected before any generation call is made.
    #[error("Invalid access key")]
    InvalidAccessKey,

    /// Presented admin secret does not match the configured one.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid admin secret")]
    InvalidAdminSecret,

    /// The batch asks for more keywords than the key has credits left.
    ///
    /// Returns HTTP 400 Bad Request. The whole batch is rejected up front;
    /// no keyword is processed and no credit is consumed.
    #[error("Insufficient credits: {remaining} remaining, {requested} requested")]
    InsufficientCredits { remaining: u32, requested: u32 },

    /// Upstream generation call failed or returned nothing parseable.
    ///
    /// Returns HTTP 502 when it surfaces directly (format conversion is the
    /// only route where it can); within a batch it is captured into the
    /// per-keyword status instead.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Generated content parsed but failed structural or length checks.
    ///
    /// Treated exactly like `GenerationFailed` by the orchestrator.
    #[error("Generated content rejected: {0}")]
    ContentRejected(String),

    /// Key issuance could not find a collision-free identifier.
    ///
    /// With a 32^9 id space this indicates a broken store, not bad luck.
    #[error("Access key id space exhausted")]
    IdSpaceExhausted,

    /// Request body or parameters are invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidAccessKey` / `InvalidAdminSecret` → 401 Unauthorized
/// - `InsufficientCredits` / `InvalidRequest` → 400 Bad Request
/// - `GenerationFailed` / `ContentRejected` → 502 Bad Gateway
/// - `IdSpaceExhausted` / `Database` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidAccessKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_access_key",
                self.to_string(),
            ),
            AppError::InvalidAdminSecret => (
                StatusCode::UNAUTHORIZED,
                "invalid_admin_secret",
                self.to_string(),
            ),
            AppError::InsufficientCredits { .. } => (
                StatusCode::BAD_REQUEST,
                "insufficient_credits",
                self.to_string(),
            ),
            AppError::GenerationFailed(_) => (
                StatusCode::BAD_GATEWAY,
                "generation_failed",
                self.to_string(),
            ),
            AppError::ContentRejected(_) => (
                StatusCode::BAD_GATEWAY,
                "content_rejected",
                self.to_string(),
            ),
            AppError::IdSpaceExhausted => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "id_space_exhausted",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
