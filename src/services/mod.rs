//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers:
//! credit accounting, content generation, batch orchestration, analytics,
//! key issuance, and upstream pacing.

pub mod analytics;
pub mod batch;
pub mod generator;
pub mod issuance;
pub mod ledger;
pub mod prompts;
pub mod rate_limit;
