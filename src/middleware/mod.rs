//! HTTP middleware components.
//!
//! Middleware run before route handlers.
//! They can:
//! - Reject requests without the shared API key
//! - Attach CORS headers to every response

/// API key gate
pub mod api_key;
/// CORS allow-list
pub mod cors;
