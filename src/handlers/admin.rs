//! Admin HTTP handlers.
//!
//! All routes in this module sit behind the admin-secret middleware
//! (`middleware::auth::admin_auth`):
//! - POST /api/v1/admin/keys - Issue an access key manually
//! - DELETE /api/v1/admin/keys/{id} - Revoke a key
//! - GET /api/v1/admin/dashboard - Analytics rollup
//! - POST /api/v1/purchases - "credits purchased" event from checkout

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::access_key,
    services::{analytics, ledger},
    state::AppState,
};

/// Request body for manual key creation.
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    /// Pricing plan; defaults to basic
    #[serde(default = "default_plan")]
    pub plan: String,

    /// Credit override; when absent the plan's fixed allocation applies
    pub credits: Option<u32>,

    pub email: Option<String>,
}

fn default_plan() -> String {
    "basic".to_string()
}

/// Response for key creation (manual or purchase-driven).
#[derive(Debug, Serialize)]
pub struct CreatedKeyResponse {
    pub access_key: String,
    pub plan: String,
    pub credits: i32,
}

/// Issue a new access key manually.
///
/// # Endpoint
///
/// `POST /api/v1/admin/keys`
///
/// # Request Body
///
/// ```json
/// { "plan": "blogger", "email": "writer@example.com" }
/// ```
///
/// # Response (200)
///
/// ```json
/// { "access_key": "KWA-7XJ-Q2M-9RD", "plan": "blogger", "credits": 100 }
/// ```
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<CreateKeyRequest>,
) -> Result<Json<CreatedKeyResponse>, AppError> {
    let key = ledger::create(
        state.store.as_ref(),
        &request.plan,
        request.credits,
        request.email,
    )
    .await?;

    Ok(Json(CreatedKeyResponse {
        access_key: key.id,
        plan: key.plan,
        credits: key.credits_total,
    }))
}

/// Revoke an access key.
///
/// Keys are never deleted; revocation flips the status so validation and
/// batch submission reject the key while its history stays intact.
pub async fn revoke_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .set_key_status(&key_id, access_key::STATUS_REVOKED)
        .await?;

    tracing::info!(key_id = %key_id, "access key revoked");
    Ok(Json(serde_json::json!({ "revoked": key_id })))
}

/// "Credits purchased" event consumed from the external checkout service.
///
/// # Endpoint
///
/// `POST /api/v1/purchases`
///
/// Checkout session verification happens upstream; by the time this fires
/// the payment is settled, so the handler only issues the key for the plan.
#[derive(Debug, Deserialize)]
pub struct PurchaseEvent {
    pub plan: String,
    pub email: Option<String>,
}

pub async fn purchase_completed(
    State(state): State<AppState>,
    Json(event): Json<PurchaseEvent>,
) -> Result<Json<CreatedKeyResponse>, AppError> {
    let key = ledger::create(state.store.as_ref(), &event.plan, None, event.email).await?;

    tracing::info!(key_id = %key.id, plan = %key.plan, "key issued for purchase");
    Ok(Json(CreatedKeyResponse {
        access_key: key.id,
        plan: key.plan,
        credits: key.credits_total,
    }))
}

/// Full analytics rollup for the admin dashboard.
///
/// # Endpoint
///
/// `GET /api/v1/admin/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<analytics::Dashboard>, AppError> {
    let keys = state.store.list_access_keys().await?;
    let attempts = state.store.list_attempts().await?;

    Ok(Json(analytics::dashboard(&keys, &attempts, Utc::now())))
}
