//! Data models representing store entities and batch-processing state.

/// Access key and credit balance model
pub mod access_key;
/// Generation attempt log model
pub mod attempt;
/// Generated article model and output formats
pub mod article;
/// Keyword processing state machine
pub mod keyword;
