//! Contact-form data models and API request/response types.
//!
//! This module defines:
//! - `ContactSubmission`: a validated contact-form payload
//! - `FieldError` / `ValidationErrors`: per-field schema violations returned with HTTP 422
//! - `SendEmailResponse`: response body of the contact endpoint
//!
//! A submission only lives for one request. It is discarded once the email has been
//! relayed or the attempt has failed.

use std::fmt;

use lettre::Address;
use nutype::nutype;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Submitter's name, at most 100 characters.
#[nutype(
    validate(len_char_max = ContactName::MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, Deref, Display)
)]
pub struct ContactName(String);

impl ContactName {
    pub const MAX_LEN: usize = 100;
}

/// Submitter's phone number, at most 20 characters. The format is not checked.
#[nutype(
    validate(len_char_max = ContactPhone::MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, Deref, Display)
)]
pub struct ContactPhone(String);

impl ContactPhone {
    pub const MAX_LEN: usize = 20;
}

#[nutype(
    validate(len_char_max = ContactSubject::MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, Deref, Display)
)]
pub struct ContactSubject(String);

impl ContactSubject {
    pub const MAX_LEN: usize = 150;
}

#[nutype(
    validate(len_char_max = ContactMessageBody::MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, Deref, Display)
)]
pub struct ContactMessageBody(String);

impl ContactMessageBody {
    pub const MAX_LEN: usize = 2000;
}

/// A contact-form payload that passed every schema rule.
///
/// # JSON Example
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
/// # Validation
///
/// - All five fields are required and must be strings
/// - `name` ≤ 100, `phone` ≤ 20, `subject` ≤ 150, `message` ≤ 2000 characters
/// - `email` must be a syntactically valid address
///
/// Values are kept verbatim; nothing is escaped because the only consumer is a
/// plaintext email body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: Address,
    pub phone: ContactPhone,
    pub subject: ContactSubject,
    pub message: ContactMessageBody,
}

impl ContactSubmission {
    /// Validate an untyped JSON body.
    ///
    /// Every field is checked even after the first failure, so the error lists all
    /// offending fields in the order name, email, phone, subject, message.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let Some(fields) = body.as_object() else {
            return Err(FieldError::not_an_object(body.clone()).into());
        };

        let mut errors = Vec::new();
        let mut check = FieldCheck {
            body,
            fields,
            errors: &mut errors,
        };

        let name = check.text("name", ContactName::MAX_LEN, |v| ContactName::try_new(v));
        let email = check.email("email");
        let phone = check.text("phone", ContactPhone::MAX_LEN, |v| ContactPhone::try_new(v));
        let subject = check.text("subject", ContactSubject::MAX_LEN, |v| {
            ContactSubject::try_new(v)
        });
        let message = check.text("message", ContactMessageBody::MAX_LEN, |v| {
            ContactMessageBody::try_new(v)
        });

        match (name, email, phone, subject, message) {
            (Some(name), Some(email), Some(phone), Some(subject), Some(message)) => Ok(Self {
                name,
                email,
                phone,
                subject,
                message,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Collects field errors while a body is being checked.
struct FieldCheck<'a> {
    body: &'a Value,
    fields: &'a Map<String, Value>,
    errors: &'a mut Vec<FieldError>,
}

impl FieldCheck<'_> {
    fn string(&mut self, field: &'static str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Value::String(value)) => Some(value.as_str()),
            Some(other) => {
                self.errors.push(FieldError::not_a_string(field, other.clone()));
                None
            }
            None => {
                self.errors.push(FieldError::missing(field, self.body.clone()));
                None
            }
        }
    }

    fn text<T, E>(
        &mut self,
        field: &'static str,
        max_length: usize,
        try_new: impl FnOnce(String) -> Result<T, E>,
    ) -> Option<T> {
        let value = self.string(field)?.to_string();

        match try_new(value.clone()) {
            Ok(text) => Some(text),
            Err(_) => {
                self.errors
                    .push(FieldError::too_long(field, max_length, value));
                None
            }
        }
    }

    fn email(&mut self, field: &'static str) -> Option<Address> {
        let value = self.string(field)?.to_string();

        let reason = match value.parse::<Address>() {
            Ok(address) if has_dotted_domain(&address) => return Some(address),
            Ok(_) => "The part after the @-sign is not valid. It should have a period.".to_string(),
            Err(err) => err.to_string(),
        };

        self.errors
            .push(FieldError::invalid_email(field, value, reason));
        None
    }
}

/// Rejects single-label hosts (`localhost`, `example`) and address literals (`[127.0.0.1]`),
/// which are syntactically valid but never a public mailbox.
fn has_dotted_domain(address: &Address) -> bool {
    let domain = address.domain();
    !domain.starts_with('[')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// One schema violation, serialized in the FastAPI/pydantic error shape.
///
/// ```json
/// {
///   "type": "string_too_long",
///   "loc": ["body", "name"],
///   "msg": "String should have at most 100 characters",
///   "input": "...",
///   "ctx": { "max_length": 100 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Path of the offending value, always rooted at `"body"`.
    pub loc: Vec<Value>,

    pub msg: String,

    /// The rejected value (for `missing`, the whole body).
    pub input: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl FieldError {
    pub fn missing(field: &str, body: Value) -> Self {
        Self {
            kind: "missing",
            loc: vec!["body".into(), field.into()],
            msg: "Field required".to_string(),
            input: body,
            ctx: None,
        }
    }

    pub fn not_a_string(field: &str, input: Value) -> Self {
        Self {
            kind: "string_type",
            loc: vec!["body".into(), field.into()],
            msg: "Input should be a valid string".to_string(),
            input,
            ctx: None,
        }
    }

    pub fn too_long(field: &str, max_length: usize, input: String) -> Self {
        Self {
            kind: "string_too_long",
            loc: vec!["body".into(), field.into()],
            msg: format!("String should have at most {max_length} characters"),
            input: input.into(),
            ctx: Some(json!({ "max_length": max_length })),
        }
    }

    pub fn invalid_email(field: &str, input: String, reason: String) -> Self {
        Self {
            kind: "value_error",
            loc: vec!["body".into(), field.into()],
            msg: format!("value is not a valid email address: {reason}"),
            input: input.into(),
            ctx: Some(json!({ "reason": reason })),
        }
    }

    pub fn not_an_object(input: Value) -> Self {
        Self {
            kind: "model_attributes_type",
            loc: vec!["body".into()],
            msg: "Input should be a valid dictionary or object to extract fields from"
                .to_string(),
            input,
            ctx: None,
        }
    }

    /// The request carried no body at all.
    pub fn missing_body() -> Self {
        Self {
            kind: "missing",
            loc: vec!["body".into()],
            msg: "Field required".to_string(),
            input: Value::Null,
            ctx: None,
        }
    }

    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self {
            kind: "json_invalid",
            loc: vec!["body".into()],
            msg: "JSON decode error".to_string(),
            input: json!({}),
            ctx: Some(json!({
                "error": err.to_string(),
                "line": err.line(),
                "column": err.column(),
            })),
        }
    }

    /// Name of the offending field, if the error is about a single field.
    pub fn field(&self) -> Option<&str> {
        self.loc.get(1).and_then(Value::as_str)
    }
}

/// Every schema violation found in one request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            match error.field() {
                Some(field) => write!(f, "{field}: {}", error.msg)?,
                None => f.write_str(&error.msg)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Response body of `POST /send-email/`.
///
/// Both variants are sent with HTTP 200; clients tell them apart by the presence of
/// `status` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SendEmailResponse {
    Sent {
        status: &'static str,
        message: &'static str,
    },
    Failed {
        error: &'static str,
        message: &'static str,
    },
}

impl SendEmailResponse {
    pub fn sent() -> Self {
        Self::Sent {
            status: "success",
            message: "Message sent successfully",
        }
    }

    pub fn failed() -> Self {
        Self::Failed {
            error: "Server Error",
            message: "There was an issue sending your message. Please try again later.",
        }
    }
}
