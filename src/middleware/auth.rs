//! Admin-secret authentication middleware.
//!
//! The admin surface (key creation, purchases, dashboard) is protected by a
//! single shared secret presented in the `x-admin-secret` header. The secret
//! comes from configuration, never from source, and comparison goes through
//! SHA-256 digests so the time taken is independent of where the first
//! mismatching byte falls.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{error::AppError, state::AppState};

/// Header carrying the admin secret.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Admin authentication middleware function.
///
/// # Flow
///
/// 1. Extract the `x-admin-secret` header from the request
/// 2. Compare it against the configured secret (timing-safe)
/// 3. If it matches: call the next handler
/// 4. If missing or wrong: return 401 Unauthorized
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidAdminSecret)?;

    if !secrets_match(presented, &state.admin_secret) {
        return Err(AppError::InvalidAdminSecret);
    }

    Ok(next.run(request).await)
}

/// Timing-safe comparison of a presented secret against the expected one.
///
/// Both sides are hashed to fixed-length digests and the digests compared
/// without short-circuiting, so neither the length nor the position of a
/// mismatch leaks through response timing.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secrets() {
        assert!(secrets_match("hunter2", "hunter2"));
    }

    #[test]
    fn mismatched_secrets() {
        assert!(!secrets_match("hunter2", "hunter3"));
        assert!(!secrets_match("", "hunter2"));
        assert!(!secrets_match("hunter2longer", "hunter2"));
    }
}
