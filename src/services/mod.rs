//! Business logic services.
//!
//! Services hold the outbound side effects, kept apart from the HTTP handlers.

pub mod mailer;
