//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, state)
//! 2. Performs the relay (validation, email delivery)
//! 3. Returns HTTP response (JSON, status code)

/// Contact-form endpoint
pub mod contact;
/// Unknown paths and methods
pub mod fallback;
