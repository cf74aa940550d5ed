//! PostgreSQL-backed store implementation.
//!
//! All credit mutation happens inside a database transaction with a row lock
//! on the key, so concurrent batches against the same key serialize at the
//! database and the `credits_used <= credits_total` invariant holds even
//! under races.

use async_trait::async_trait;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::access_key::{self, AccessKey};
use crate::models::attempt::AttemptLogEntry;
use crate::store::Store;

/// Production store over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_access_key(&self, id: &str) -> Result<Option<AccessKey>, AppError> {
        let key = sqlx::query_as::<_, AccessKey>("SELECT * FROM access_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(key)
    }

    async fn create_access_key(&self, key: &AccessKey) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO access_keys (id, plan, credits_total, credits_used, email, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&key.id)
        .bind(&key.plan)
        .bind(key.credits_total)
        .bind(key.credits_used)
        .bind(&key.email)
        .bind(&key.status)
        .bind(key.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_credits(&self, id: &str, count: u32) -> Result<u32, AppError> {
        let count = count as i32;

        // Start database transaction
        let mut tx = self.pool.begin().await?;

        // Lock the key row and read the balance
        // FOR UPDATE ensures no other transaction can modify this row
        let row: Option<(i32, i32)> = sqlx::query_as(
            "SELECT credits_total, credits_used FROM access_keys WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (credits_total, credits_used) = row.ok_or(AppError::InvalidAccessKey)?;

        // Enforce the balance invariant under the row lock
        if credits_used + count > credits_total {
            tx.rollback().await?;
            return Err(AppError::InsufficientCredits {
                remaining: (credits_total - credits_used).max(0) as u32,
                requested: count as u32,
            });
        }

        let new_used = credits_used + count;
        let new_status = if new_used >= credits_total {
            access_key::STATUS_EXHAUSTED
        } else {
            access_key::STATUS_ACTIVE
        };

        sqlx::query(
            r#"
            UPDATE access_keys
            SET credits_used = $1,
                status = CASE WHEN status = 'revoked' THEN status ELSE $2 END
            WHERE id = $3
            "#,
        )
        .bind(new_used)
        .bind(new_status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Commit all changes atomically
        tx.commit().await?;

        Ok((credits_total - new_used) as u32)
    }

    async fn set_key_status(&self, id: &str, status: &str) -> Result<(), AppError> {
        let updated = sqlx::query("UPDATE access_keys SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::InvalidAccessKey);
        }

        Ok(())
    }

    async fn log_attempt(&self, entry: &AttemptLogEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO generation_attempts
                (id, access_key_id, keyword, approach, success, error_message, output_format, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.access_key_id)
        .bind(&entry.keyword)
        .bind(&entry.approach)
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(&entry.output_format)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_attempts(&self) -> Result<Vec<AttemptLogEntry>, AppError> {
        let attempts = sqlx::query_as::<_, AttemptLogEntry>(
            "SELECT * FROM generation_attempts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn list_access_keys(&self) -> Result<Vec<AccessKey>, AppError> {
        let keys =
            sqlx::query_as::<_, AccessKey>("SELECT * FROM access_keys ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(keys)
    }
}
