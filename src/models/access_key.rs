//! Access key model and credit accounting types.
//!
//! Access keys are opaque credentials identifying a purchased credit balance.
//! They are not cryptographic secrets: the key id itself (`KWA-XXX-XXX-XXX`)
//! is the primary key in the store and appears in the attempt log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key can still process keywords.
pub const STATUS_ACTIVE: &str = "active";
/// All purchased credits have been consumed.
pub const STATUS_EXHAUSTED: &str = "exhausted";
/// Key was deactivated by an operator; never deleted, only revoked.
pub const STATUS_REVOKED: &str = "revoked";

/// Represents an access key record from the store.
///
/// # Database Table
///
/// Maps to the `access_keys` table. Each key:
/// - Is identified by its human-readable id (`KWA-XXX-XXX-XXX`)
/// - Carries a plan label and a credit balance
/// - Is never deleted, only marked exhausted or revoked
///
/// # Invariant
///
/// `credits_used <= credits_total` at all times. The store's consume
/// operation enforces this atomically per key; concurrent batches against the
/// same key cannot push the balance negative.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccessKey {
    /// Human-readable key id, e.g. `KWA-7XJ-Q2M-9RD`
    pub id: String,

    /// Pricing plan label (basic, blogger, pro, admin)
    ///
    /// Stored as free text: plans are a pricing concern, and unknown labels
    /// simply map to zero credits at issuance time.
    pub plan: String,

    /// Credits purchased for this key
    pub credits_total: i32,

    /// Credits consumed so far
    ///
    /// Mutated only by the orchestrator, exactly once per successfully
    /// generated keyword.
    pub credits_used: i32,

    /// Purchaser email, when known
    pub email: Option<String>,

    /// Lifecycle status: active, exhausted, or revoked
    pub status: String,

    /// Timestamp when this key was created
    pub created_at: DateTime<Utc>,
}

impl AccessKey {
    /// Build a fresh active key. `created_at` is set to now.
    pub fn new(id: String, plan: String, credits: u32, email: Option<String>) -> Self {
        Self {
            id,
            plan,
            credits_total: credits as i32,
            credits_used: 0,
            email,
            status: STATUS_ACTIVE.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Credits still available on this key.
    pub fn credits_remaining(&self) -> u32 {
        (self.credits_total - self.credits_used).max(0) as u32
    }

    /// Whether this key may be used for new batches.
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Validation result returned to clients checking a key.
///
/// Mirrors the ledger's `validate` contract: unknown keys are an error, but
/// an exhausted or revoked key returns `valid: false` with its status as the
/// reason so the client can show a useful message.
#[derive(Debug, Clone, Serialize)]
pub struct CreditInfo {
    pub valid: bool,
    pub plan: String,
    pub credits_total: i32,
    pub credits_used: i32,
    pub credits_remaining: u32,
    pub status: String,
}

impl From<&AccessKey> for CreditInfo {
    fn from(key: &AccessKey) -> Self {
        Self {
            valid: key.is_active() && key.credits_remaining() > 0,
            plan: key.plan.clone(),
            credits_total: key.credits_total,
            credits_used: key.credits_used,
            credits_remaining: key.credits_remaining(),
            status: key.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_never_negative() {
        let mut key = AccessKey::new("KWA-AAA-BBB-CCC".into(), "basic".into(), 10, None);
        key.credits_used = 12; // corrupted row
        assert_eq!(key.credits_remaining(), 0);
    }

    #[test]
    fn credit_info_reflects_status() {
        let mut key = AccessKey::new("KWA-AAA-BBB-CCC".into(), "pro".into(), 240, None);
        assert!(CreditInfo::from(&key).valid);

        key.status = STATUS_REVOKED.to_string();
        let info = CreditInfo::from(&key);
        assert!(!info.valid);
        assert_eq!(info.status, "revoked");
    }

    #[test]
    fn exhausted_key_is_invalid() {
        let mut key = AccessKey::new("KWA-AAA-BBB-CCC".into(), "basic".into(), 10, None);
        key.credits_used = 10;
        assert!(!CreditInfo::from(&key).valid);
        assert_eq!(CreditInfo::from(&key).credits_remaining, 0);
    }
}
