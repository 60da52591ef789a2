//! Shared fixtures for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    config::Config,
    services::mailer::{ContactEmail, MailError, Mailer},
};

pub const TEST_API_KEY: &str = "test-api-key";

pub fn test_config() -> Config {
    Config {
        smtp_server: "smtp.example.com".to_string(),
        smtp_port: 465,
        email_sender: "website@example.com".to_string(),
        email_receiver: "owner@example.com".to_string(),
        email_password: "hunter2".to_string(),
        api_key: TEST_API_KEY.to_string(),
        allowed_origins: vec!["http://localhost:4321".to_string()],
        server_port: 3081,
        sender_name: "Contact Form".to_string(),
        smtp_timeout_secs: 10,
    }
}

/// In-memory [`Mailer`] that records what it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ContactEmail>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every send fails like a rejected SMTP transaction.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<ContactEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Rejected("554".to_string()));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
