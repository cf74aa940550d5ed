//! Batch keyword processing endpoint - the core of the service.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    services::batch::{self, BatchOutcome, BatchRequest},
    state::AppState,
};

/// Process a batch of keywords into generated articles.
///
/// # Endpoint
///
/// `POST /api/v1/keywords/process`
///
/// # Request Body
///
/// ```json
/// {
///   "access_key": "KWA-7XJ-Q2M-9RD",
///   "keywords": ["sourdough starters", "espresso grind size"],
///   "output_format": "wordpress",
///   "approaches": ["how-to guide", "deep dive"],
///   "include_linking_suggestions": true
/// }
/// ```
///
/// `approaches` and `include_linking_suggestions` are optional.
///
/// # Response (200)
///
/// A partial-success report: completed keywords carry their article
/// variants, failed keywords carry an error message, and
/// `credits_remaining` reflects only the keywords that actually completed.
///
/// # Errors
///
/// - **401**: unknown or revoked access key (batch not started)
/// - **400**: insufficient credits for the whole batch, or a malformed
///   keyword list (batch not started)
pub async fn process_keywords(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let outcome = batch::process_batch(
        state.store.as_ref(),
        state.generator.as_ref(),
        &state.limiter,
        request,
    )
    .await?;

    Ok(Json(outcome))
}
