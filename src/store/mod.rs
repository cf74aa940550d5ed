//! Record store contract and implementations.
//!
//! The core never talks to a database directly; it consumes this trait.
//! Two implementations exist:
//! - [`postgres::PgStore`]: production store backed by sqlx/PostgreSQL
//! - [`memory::MemoryStore`]: in-process store for tests and database-less
//!   local runs
//!
//! # Atomicity
//!
//! `consume_credits` is the only mutating operation with a race window and
//! must be atomic per key: two concurrent batches against the same key must
//! never over-consume below zero or double-count a success. PgStore uses a
//! single-row transaction with a row lock; MemoryStore a store-wide write
//! lock.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::access_key::AccessKey;
use crate::models::attempt::AttemptLogEntry;

pub mod memory;
pub mod postgres;

/// Persistence contract consumed by the ledger, orchestrator, and analytics.
#[async_trait]
pub trait Store: Send + Sync {
    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;

    /// Fetch a key by id. `None` when unknown.
    async fn get_access_key(&self, id: &str) -> Result<Option<AccessKey>, AppError>;

    /// Insert a freshly issued key.
    async fn create_access_key(&self, key: &AccessKey) -> Result<(), AppError>;

    /// Atomically consume `count` credits and return the new remaining
    /// balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAccessKey` when the id is unknown
    /// - `InsufficientCredits` when consuming would exceed `credits_total`;
    ///   the upstream batch precondition should prevent this, but the store
    ///   enforces it regardless because concurrent batches can race
    async fn consume_credits(&self, id: &str, count: u32) -> Result<u32, AppError>;

    /// Update a key's lifecycle status (revocation).
    async fn set_key_status(&self, id: &str, status: &str) -> Result<(), AppError>;

    /// Append one attempt to the generation log.
    async fn log_attempt(&self, entry: &AttemptLogEntry) -> Result<(), AppError>;

    /// Full attempt log, newest first. Sole input to analytics.
    async fn list_attempts(&self) -> Result<Vec<AttemptLogEntry>, AppError>;

    /// All issued keys.
    async fn list_access_keys(&self) -> Result<Vec<AccessKey>, AppError>;
}
