//! Batch orchestrator - the core keyword-processing state machine.
//!
//! Takes a set of keywords plus an access key, enforces the credit
//! preconditions, drives one generation call per keyword per requested
//! approach, aggregates article variants, and reconciles credit consumption
//! with actual successes.
//!
//! # Credit semantics
//!
//! - Exactly 1 credit per keyword that produced at least one article,
//!   consumed after the keyword finishes, regardless of how many approaches
//!   were requested or succeeded.
//! - A keyword whose every approach failed consumes nothing.
//! - Precondition failures (bad key, `K > R`) reject the whole batch before
//!   any generation call; per-approach failures never abort the batch.
//!
//! # Cancellation
//!
//! Dropping the returned future (axum does this when the client disconnects)
//! stops the batch at the next await point. Credits already consumed for
//! completed keywords are final; nothing is rolled back.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::access_key;
use crate::models::article::{Article, OutputFormat};
use crate::models::attempt::AttemptLogEntry;
use crate::models::keyword::{KeywordProgress, KeywordReport, KeywordState};
use crate::services::generator::ContentGenerator;
use crate::services::ledger;
use crate::services::rate_limit::RateLimiter;
use crate::store::Store;

/// Approach label used when the client does not ask for specific variants.
pub const DEFAULT_APPROACH: &str = "standard";

/// A client-submitted batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub access_key: String,
    pub keywords: Vec<String>,
    pub output_format: OutputFormat,

    /// Stylistic variants to generate per keyword; empty means one
    /// "standard" variant
    #[serde(default)]
    pub approaches: Vec<String>,

    /// Whether to attach best-effort SEO linking hints to each article
    #[serde(default)]
    pub include_linking_suggestions: bool,
}

/// Aggregate result of a processed batch.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    /// All article variants, grouped by keyword in submission order and
    /// sorted by approach label within a keyword
    pub articles: Vec<Article>,
    pub credits_remaining: u32,
    /// Per-keyword outcome report, in submission order
    pub keywords: Vec<KeywordReport>,
}

/// Process a batch of keywords against an access key.
///
/// # Errors
///
/// Only precondition failures surface as errors:
/// - `InvalidRequest`: empty keyword list or blank keywords
/// - `InvalidAccessKey`: unknown or revoked key
/// - `InsufficientCredits`: more keywords than credits remaining
///
/// Everything downstream of the preconditions lands in the per-keyword
/// report instead.
pub async fn process_batch(
    store: &dyn Store,
    generator: &dyn ContentGenerator,
    limiter: &RateLimiter,
    request: BatchRequest,
) -> Result<BatchOutcome, AppError> {
    let keywords: Vec<String> = request
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .collect();

    if keywords.is_empty() {
        return Err(AppError::InvalidRequest("no keywords submitted".to_string()));
    }
    if keywords.iter().any(|k| k.is_empty()) {
        return Err(AppError::InvalidRequest("blank keyword in batch".to_string()));
    }

    let approaches = if request.approaches.is_empty() {
        vec![DEFAULT_APPROACH.to_string()]
    } else {
        request.approaches.clone()
    };

    // Precondition 1: the key must exist and not be revoked
    let info = ledger::validate(store, &request.access_key).await?;
    if info.status == access_key::STATUS_REVOKED {
        return Err(AppError::InvalidAccessKey);
    }

    // Precondition 2: enough credits for the whole batch. Rejected wholesale
    // rather than processing a prefix; each keyword would otherwise move
    // pending -> skipped
    let requested = keywords.len() as u32;
    if requested > info.credits_remaining {
        tracing::info!(
            key_id = %request.access_key,
            requested,
            remaining = info.credits_remaining,
            "batch rejected: insufficient credits"
        );
        return Err(AppError::InsufficientCredits {
            remaining: info.credits_remaining,
            requested,
        });
    }

    let format = request.output_format;
    let mut credits_remaining = info.credits_remaining;
    let mut articles: Vec<Article> = Vec::new();
    let mut reports: Vec<KeywordReport> = Vec::with_capacity(keywords.len());

    // Keywords run sequentially in submission order; the limiter paces the
    // upstream calls
    for keyword in &keywords {
        let mut progress = KeywordProgress::new(keyword);
        progress.advance(KeywordState::Processing);

        let mut variants: Vec<Article> = Vec::new();
        let mut last_error: Option<String> = None;

        for approach in &approaches {
            limiter.acquire().await;

            match generator.generate(keyword, format, Some(approach)).await {
                Ok(fields) => {
                    store
                        .log_attempt(&AttemptLogEntry::success(
                            &request.access_key,
                            keyword,
                            approach,
                            format.as_str(),
                        ))
                        .await?;
                    variants.push(Article::new(fields, keyword, approach, format));
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::warn!(keyword = %keyword, approach = %approach, error = %message, "approach failed");
                    store
                        .log_attempt(&AttemptLogEntry::failure(
                            &request.access_key,
                            keyword,
                            approach,
                            format.as_str(),
                            message.clone(),
                        ))
                        .await?;
                    last_error = Some(message);
                }
            }
        }

        if variants.is_empty() {
            progress.fail(last_error.unwrap_or_else(|| "generation failed".to_string()));
            reports.push(KeywordReport::from_progress(&progress, 0));
            continue;
        }

        // Stable tab ordering for multi-approach keywords
        variants.sort_by(|a, b| a.approach.cmp(&b.approach));

        if request.include_linking_suggestions {
            for article in &mut variants {
                let suggestions = generator
                    .linking_suggestions(&article.title, &article.body, keyword)
                    .await;
                article.linking_suggestions = Some(suggestions);
            }
        }

        // One credit per completed keyword, however many variants it yielded.
        // A concurrent batch can have drained the balance since the up-front
        // check; that keyword fails rather than the whole batch
        match ledger::consume(store, &request.access_key, 1).await {
            Ok(remaining) => {
                credits_remaining = remaining;
                progress.advance(KeywordState::Completed);
                reports.push(KeywordReport::from_progress(&progress, variants.len()));
                articles.extend(variants);
            }
            Err(AppError::InsufficientCredits { .. }) => {
                tracing::warn!(keyword = %keyword, "credits drained mid-batch by concurrent request");
                progress.fail("credits exhausted during processing".to_string());
                reports.push(KeywordReport::from_progress(&progress, 0));
                credits_remaining = 0;
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        key_id = %request.access_key,
        keywords = keywords.len(),
        articles = articles.len(),
        credits_remaining,
        "batch complete"
    );

    Ok(BatchOutcome {
        articles,
        credits_remaining,
        keywords: reports,
    })
}
