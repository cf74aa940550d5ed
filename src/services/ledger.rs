//! Key and credit ledger - validation, balance checks, consumption, creation.
//!
//! The ledger owns every read and write of access-key credit balances.
//! Credit consumption is delegated to the store, which enforces per-key
//! atomicity; everything here is the policy layer on top of it.

use crate::error::AppError;
use crate::models::access_key::{AccessKey, CreditInfo};
use crate::services::issuance;
use crate::store::Store;

/// Validate an access key.
///
/// # Returns
///
/// `CreditInfo` describing the key. An exhausted or revoked key is not an
/// error: it comes back with `valid: false` and its status as the reason so
/// clients can explain the rejection.
///
/// # Errors
///
/// - `InvalidAccessKey` when the id is unknown
pub async fn validate(store: &dyn Store, key_id: &str) -> Result<CreditInfo, AppError> {
    let key = store
        .get_access_key(key_id)
        .await?
        .ok_or(AppError::InvalidAccessKey)?;

    Ok(CreditInfo::from(&key))
}

/// Read-only check that the key has at least `needed` credits remaining.
///
/// Does not mutate. The orchestrator re-derives remaining-after-success
/// incrementally rather than pre-reserving, because failed keywords must not
/// consume credit.
pub async fn reserve_check(store: &dyn Store, key_id: &str, needed: u32) -> Result<bool, AppError> {
    let info = validate(store, key_id).await?;
    Ok(info.valid && info.credits_remaining >= needed)
}

/// Consume `count` credits and return the new remaining balance.
///
/// Atomic per key (see the store contract). Upstream checks make an
/// `InsufficientCredits` failure here unlikely, but concurrent batches
/// against the same key can still race into it.
pub async fn consume(store: &dyn Store, key_id: &str, count: u32) -> Result<u32, AppError> {
    let remaining = store.consume_credits(key_id, count).await?;
    tracing::debug!(key_id, count, remaining, "credits consumed");
    Ok(remaining)
}

/// Issue and persist a new access key.
///
/// `credits` overrides the plan mapping when provided (admin override);
/// otherwise the plan's fixed allocation applies.
pub async fn create(
    store: &dyn Store,
    plan: &str,
    credits: Option<u32>,
    email: Option<String>,
) -> Result<AccessKey, AppError> {
    let credits = credits.unwrap_or_else(|| issuance::credits_for_plan(plan));
    let id = issuance::generate_unique_key_id(store).await?;

    let key = AccessKey::new(id, plan.to_string(), credits, email);
    store.create_access_key(&key).await?;

    tracing::info!(key_id = %key.id, plan, credits, "access key created");
    Ok(key)
}
