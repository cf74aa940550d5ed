//! In-memory store implementation.
//!
//! Backs the test suite and `DATABASE_URL`-less local runs. A single
//! `RwLock` over the whole store stands in for the database's per-row
//! locking: `consume_credits` takes the write lock for its entire
//! read-check-update sequence, which gives the same per-key atomicity.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::access_key::{self, AccessKey};
use crate::models::attempt::AttemptLogEntry;
use crate::store::Store;

#[derive(Default)]
struct Inner {
    keys: HashMap<String, AccessKey>,
    attempts: Vec<AttemptLogEntry>,
}

/// Process-local store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing issuance. Test helper.
    pub async fn insert_key(&self, key: AccessKey) {
        self.inner.write().await.keys.insert(key.id.clone(), key);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_access_key(&self, id: &str) -> Result<Option<AccessKey>, AppError> {
        Ok(self.inner.read().await.keys.get(id).cloned())
    }

    async fn create_access_key(&self, key: &AccessKey) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.keys.insert(key.id.clone(), key.clone());
        Ok(())
    }

    async fn consume_credits(&self, id: &str, count: u32) -> Result<u32, AppError> {
        // Write lock held across check and update; this is the atomicity
        // boundary for concurrent batches on the same key
        let mut inner = self.inner.write().await;
        let key = inner.keys.get_mut(id).ok_or(AppError::InvalidAccessKey)?;

        let count = count as i32;
        if key.credits_used + count > key.credits_total {
            return Err(AppError::InsufficientCredits {
                remaining: key.credits_remaining(),
                requested: count as u32,
            });
        }

        key.credits_used += count;
        if key.credits_used >= key.credits_total && key.status != access_key::STATUS_REVOKED {
            key.status = access_key::STATUS_EXHAUSTED.to_string();
        }

        Ok(key.credits_remaining())
    }

    async fn set_key_status(&self, id: &str, status: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let key = inner.keys.get_mut(id).ok_or(AppError::InvalidAccessKey)?;
        key.status = status.to_string();
        Ok(())
    }

    async fn log_attempt(&self, entry: &AttemptLogEntry) -> Result<(), AppError> {
        self.inner.write().await.attempts.push(entry.clone());
        Ok(())
    }

    async fn list_attempts(&self) -> Result<Vec<AttemptLogEntry>, AppError> {
        let inner = self.inner.read().await;
        let mut attempts = inner.attempts.clone();
        attempts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(attempts)
    }

    async fn list_access_keys(&self) -> Result<Vec<AccessKey>, AppError> {
        Ok(self.inner.read().await.keys.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consume_enforces_balance_invariant() {
        let store = MemoryStore::new();
        store
            .insert_key(AccessKey::new(
                "KWA-AAA-BBB-CCC".into(),
                "basic".into(),
                2,
                None,
            ))
            .await;

        assert_eq!(store.consume_credits("KWA-AAA-BBB-CCC", 1).await.unwrap(), 1);
        assert_eq!(store.consume_credits("KWA-AAA-BBB-CCC", 1).await.unwrap(), 0);

        let err = store.consume_credits("KWA-AAA-BBB-CCC", 1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientCredits { remaining: 0, requested: 1 }
        ));

        // Draining the balance flips the key to exhausted
        let key = store.get_access_key("KWA-AAA-BBB-CCC").await.unwrap().unwrap();
        assert_eq!(key.status, access_key::STATUS_EXHAUSTED);
    }

    #[tokio::test]
    async fn concurrent_consumption_never_overspends() {
        let store = MemoryStore::new();
        store
            .insert_key(AccessKey::new(
                "KWA-DDD-EEE-FFF".into(),
                "basic".into(),
                10,
                None,
            ))
            .await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.consume_credits("KWA-DDD-EEE-FFF", 1).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 10);
        let key = store.get_access_key("KWA-DDD-EEE-FFF").await.unwrap().unwrap();
        assert_eq!(key.credits_used, 10);
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.consume_credits("KWA-XXX-XXX-XXX", 1).await,
            Err(AppError::InvalidAccessKey)
        ));
    }
}
