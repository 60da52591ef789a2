//! Email transport for contact submissions.
//!
//! A submission becomes exactly one plaintext message addressed to the configured
//! receiver. Messages are sent over implicit TLS (no STARTTLS upgrade) with
//! username/password authentication. Nothing is queued or retried: a failed send
//! is reported to the caller and forgotten.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::{Config, ConfigError},
    models::contact::ContactSubmission,
};

/// Delivery failure of a single message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// Connection refused, TLS or authentication failure, timeout.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("SMTP server rejected the message with code {0}")]
    Rejected(String),
}

/// The email produced from one contact submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    /// Submitter's address, so replies go straight to them.
    pub reply_to: Address,
    pub subject: String,
    pub body: String,
}

impl ContactEmail {
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        let body = format!(
            "Email sent from Website Contact Form\n\
             Contact Name: {}\n\
             Contact Phone: {}\n\
             Contact Email: {}\n\n\
             Message:\n{}",
            submission.name, submission.phone, submission.email, submission.message,
        );

        Self {
            reply_to: submission.email.clone(),
            subject: format!("Contact form: {}", submission.subject),
            body,
        }
    }
}

/// Async email sending trait.
///
/// The HTTP layer only depends on this trait, so tests can swap the SMTP relay for an
/// in-memory double.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &ContactEmail) -> Result<(), MailError>;
}

/// SMTP relay mailer using lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from the startup configuration.
    ///
    /// No connection is opened here; the first send connects.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.email_sender.clone(),
                config.email_password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.smtp_timeout_secs)))
            .build();

        Ok(Self {
            transport,
            from: config.sender_mailbox()?,
            to: config.receiver_mailbox()?,
        })
    }

    fn build_message(&self, email: &ContactEmail) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(Mailbox::new(None, email.reply_to.clone()))
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;

        if !response.is_positive() {
            return Err(MailError::Rejected(response.code().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::test_config;

    fn submission() -> ContactSubmission {
        ContactSubmission::from_json(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "subject": "Quote request",
            "message": "Can you call me back?"
        }))
        .unwrap()
    }

    #[test]
    fn composes_subject_reply_to_and_body() {
        let email = ContactEmail::from_submission(&submission());

        assert_eq!(email.subject, "Contact form: Quote request");
        assert_eq!(email.reply_to.to_string(), "jane@example.com");
        assert_eq!(
            email.body,
            "Email sent from Website Contact Form\n\
             Contact Name: Jane Doe\n\
             Contact Phone: 555-0100\n\
             Contact Email: jane@example.com\n\n\
             Message:\nCan you call me back?"
        );
    }

    #[tokio::test]
    async fn message_carries_fixed_sender_and_receiver() {
        let mailer = SmtpMailer::new(&test_config()).unwrap();
        let email = ContactEmail::from_submission(&submission());

        let message = mailer.build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        let from = formatted
            .lines()
            .find(|line| line.starts_with("From: "))
            .unwrap();
        assert!(from.contains("Contact Form"));
        assert!(from.contains("<website@example.com>"));
        assert!(formatted.contains("To: owner@example.com"));
        assert!(formatted.contains("Reply-To: jane@example.com"));
        assert!(formatted.contains("Subject: Contact form: Quote request"));
        assert!(formatted.contains("Content-Type: text/plain"));
        assert!(formatted.contains("Contact Name: Jane Doe"));
        assert!(formatted.contains("Can you call me back?"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_delivery_failure() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = test_config();
        config.smtp_server = "127.0.0.1".to_string();
        config.smtp_port = port;
        config.smtp_timeout_secs = 2;
        let mailer = SmtpMailer::new(&config).unwrap();

        let result = mailer
            .send(&ContactEmail::from_submission(&submission()))
            .await;

        assert!(matches!(result, Err(MailError::Smtp(_))));
    }
}
