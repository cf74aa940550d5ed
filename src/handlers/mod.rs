//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service for the business logic
//! 3. Returns HTTP response (JSON, status code)

/// Admin surface: key issuance, purchases, analytics dashboard
pub mod admin;
/// Article format conversion
pub mod articles;
/// Health check
pub mod health;
/// Access key validation
pub mod keys;
/// Batch keyword processing
pub mod keywords;
