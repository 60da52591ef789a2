//! Responses for requests no route matches.

use crate::error::AppError;

/// Any path other than the contact endpoint.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// A known path requested with a method it does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
