//! Request and response data models.

/// Contact-form submission, validation errors and response bodies
pub mod contact;
