//! Error types and HTTP error response handling.
//!
//! This module defines the errors a request can end in and how they are converted
//! into HTTP responses. Bodies follow the `{"detail": ...}` shape the
//! contact-form clients already parse.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::contact::ValidationErrors;

/// Errors that end a request before (or instead of) the email being relayed.
///
/// Delivery failures are deliberately absent: the contact handler turns them into a
/// soft-error payload with HTTP 200.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `x-api-key` header is missing or does not match the configured secret.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Request body failed the contact-form schema.
    ///
    /// Returns HTTP 422 Unprocessable Entity with one entry per offending field.
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Convert AppError into an HTTP response.
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 401 `{"detail": "Unauthorized"}`
/// - `NotFound` → 404 `{"detail": "Not Found"}`
/// - `MethodNotAllowed` → 405 `{"detail": "Method Not Allowed"}`
/// - `Validation` → 422 `{"detail": [ ...field errors... ]}`
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!(errors.into_inner()))
            }
            other => {
                let status = match other {
                    AppError::Unauthorized => StatusCode::UNAUTHORIZED,
                    AppError::NotFound => StatusCode::NOT_FOUND,
                    _ => StatusCode::METHOD_NOT_ALLOWED,
                };
                (status, json!(other.to_string()))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::FieldError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401_detail() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "detail": "Unauthorized" }));
    }

    #[tokio::test]
    async fn validation_maps_to_422_detail_list() {
        let errors = ValidationErrors::from(vec![FieldError::missing("name", json!({}))]);
        let response = AppError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["type"], "missing");
        assert_eq!(body["detail"][0]["loc"], json!(["body", "name"]));
    }
}
