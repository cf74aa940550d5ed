//! Access key validation endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    error::AppError, models::access_key::CreditInfo, services::ledger, state::AppState,
};

/// Request body for key validation.
#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    pub access_key: String,
}

/// Validate an access key and report its credit balance.
///
/// # Endpoint
///
/// `POST /api/v1/keys/validate`
///
/// # Request Body
///
/// ```json
/// { "access_key": "KWA-7XJ-Q2M-9RD" }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "valid": true,
///   "plan": "pro",
///   "credits_total": 240,
///   "credits_used": 12,
///   "credits_remaining": 228,
///   "status": "active"
/// }
/// ```
///
/// An exhausted or revoked key still returns 200 with `valid: false` and the
/// status as the reason; only an unknown key returns 401.
pub async fn validate_key(
    State(state): State<AppState>,
    Json(request): Json<ValidateKeyRequest>,
) -> Result<Json<CreditInfo>, AppError> {
    let info = ledger::validate(state.store.as_ref(), &request.access_key).await?;
    Ok(Json(info))
}
