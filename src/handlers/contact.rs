//! Contact-form HTTP handler.
//!
//! This module implements the only business endpoint:
//! - POST /send-email/ - Validate a submission and relay it as an email

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request, State},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    app::AppState,
    error::AppError,
    models::contact::{ContactSubmission, FieldError, SendEmailResponse, ValidationErrors},
    services::mailer::ContactEmail,
};

/// Extractor yielding a validated [`ContactSubmission`].
///
/// Unlike `Json<T>`, a rejection lists every offending field and is answered with
/// HTTP 422. The raw body is logged alongside the errors.
pub struct ContactForm(pub ContactSubmission);

impl<S> FromRequest<S> for ContactForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match parse_submission(&bytes) {
            Ok(submission) => Ok(ContactForm(submission)),
            Err(errors) => {
                tracing::error!(
                    body = %String::from_utf8_lossy(&bytes),
                    "Validation error for request body"
                );
                tracing::error!(
                    count = errors.errors().len(),
                    errors = %errors,
                    "Validation errors"
                );
                Err(AppError::Validation(errors).into_response())
            }
        }
    }
}

fn parse_submission(bytes: &[u8]) -> Result<ContactSubmission, ValidationErrors> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FieldError::missing_body().into());
    }

    let body: Value =
        serde_json::from_slice(bytes).map_err(|err| FieldError::invalid_json(&err))?;

    ContactSubmission::from_json(&body)
}

/// Relay a contact-form submission by email.
///
/// # Endpoint
///
/// `POST /send-email/`
///
/// # Authentication
///
/// Requires the shared secret in the `x-api-key` header.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "phone": "555-0100",
///   "subject": "Quote request",
///   "message": "Hello!"
/// }
/// ```
///
/// # Response
///
/// - **200**: `{"status": "success", "message": "Message sent successfully"}`
/// - **200**: `{"error": "Server Error", "message": "..."}` when delivery failed
/// - **422**: `{"detail": [...]}` when the body fails validation
/// - **401**: Invalid API key
///
/// Delivery failures never produce a 5xx: clients only distinguish the two 200 bodies.
pub async fn send_email(
    State(state): State<AppState>,
    ContactForm(submission): ContactForm,
) -> Json<SendEmailResponse> {
    tracing::info!(
        name = %submission.name,
        email = %submission.email,
        phone = %submission.phone,
        subject = %submission.subject,
        "Validated form data"
    );

    let email = ContactEmail::from_submission(&submission);

    match state.mailer.send(&email).await {
        Ok(()) => {
            tracing::info!(reply_to = %email.reply_to, "Contact email sent");
            Json(SendEmailResponse::sent())
        }
        Err(err) => {
            tracing::error!(error = %err, "Error sending email");
            Json(SendEmailResponse::failed())
        }
    }
}
