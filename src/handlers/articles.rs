//! Article format conversion endpoint.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::access_key,
    models::article::{OutputFormat, PostFields},
    services::{generator, ledger},
    state::AppState,
};

/// Request body for format conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub access_key: String,
    pub title: String,
    pub tldr: String,
    pub body: String,
    pub from_format: OutputFormat,
    pub to_format: OutputFormat,
}

/// Converted (or original) article fields.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub title: String,
    pub tldr: String,
    pub body: String,
    pub format: OutputFormat,
}

/// Re-render an existing article into a different target format.
///
/// # Endpoint
///
/// `POST /api/v1/articles/convert`
///
/// # Policy
///
/// Conversion is free (no credit consumed) but requires a known, non-revoked
/// access key.
/// A conversion failure is deliberately invisible: the caller receives the
/// original, unconverted fields instead of an error.
pub async fn convert_article(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    // Known, non-revoked key required; balance is irrelevant since
    // conversion is free
    let info = ledger::validate(state.store.as_ref(), &request.access_key).await?;
    if info.status == access_key::STATUS_REVOKED {
        return Err(AppError::InvalidAccessKey);
    }

    let original = PostFields {
        title: request.title,
        tldr: request.tldr,
        body: request.body,
    };

    let fields = generator::convert_or_keep(
        state.generator.as_ref(),
        original,
        request.from_format,
        request.to_format,
    )
    .await;

    Ok(Json(ConvertResponse {
        title: fields.title,
        tldr: fields.tldr,
        body: fields.body,
        format: request.to_format,
    }))
}
