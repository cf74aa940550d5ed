//! Generation attempt log model.
//!
//! Every call into the generation provider, successful or not, produces
//! exactly one `AttemptLogEntry`. The log is append-only and is the sole
//! input to the analytics rollups.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One generation attempt, as recorded in the `generation_attempts` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AttemptLogEntry {
    pub id: Uuid,

    /// Access key the batch ran under
    pub access_key_id: String,

    /// Keyword this attempt was for
    pub keyword: String,

    /// Approach label requested for this attempt
    pub approach: String,

    /// Whether the provider returned usable content
    pub success: bool,

    /// Failure message when `success` is false
    pub error_message: Option<String>,

    /// Output format requested for the batch
    pub output_format: String,

    pub created_at: DateTime<Utc>,
}

impl AttemptLogEntry {
    pub fn success(key_id: &str, keyword: &str, approach: &str, format: &str) -> Self {
        Self::record(key_id, keyword, approach, format, true, None)
    }

    pub fn failure(
        key_id: &str,
        keyword: &str,
        approach: &str,
        format: &str,
        message: String,
    ) -> Self {
        Self::record(key_id, keyword, approach, format, false, Some(message))
    }

    fn record(
        key_id: &str,
        keyword: &str,
        approach: &str,
        format: &str,
        success: bool,
        error_message: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            access_key_id: key_id.to_string(),
            keyword: keyword.to_string(),
            approach: approach.to_string(),
            success,
            error_message,
            output_format: format.to_string(),
            created_at: Utc::now(),
        }
    }
}
