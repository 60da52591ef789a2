//! API key authentication middleware.
//!
//! This middleware intercepts every request to:
//! 1. Let CORS pre-flight (`OPTIONS`) requests through untouched
//! 2. Compare the `x-api-key` header against the configured secret
//! 3. Reject missing or wrong keys with HTTP 401 before any handler runs

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::{config::Config, error::AppError};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key gate middleware function.
///
/// # Flow
///
/// 1. `OPTIONS` requests are forwarded without any check
/// 2. Read the `x-api-key` header
/// 3. Compare it with `Config::api_key` in constant time
/// 4. If equal: call the next handler and return its response unchanged
/// 5. Otherwise: return 401 Unauthorized, the handler is never invoked
///
/// # Headers
///
/// Expected header format:
/// ```text
/// x-api-key: <secret>
/// ```
pub async fn require_api_key(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|provided| keys_match(provided.as_bytes(), config.api_key.as_bytes()));

    if !authorized {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with missing or invalid API key"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Constant-time comparison; slices of different length never match.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.ct_eq(expected).into()
}
