//! HTTP middleware.

/// Admin-secret authentication middleware
pub mod auth;
