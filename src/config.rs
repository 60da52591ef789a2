//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct,
//! which is then checked once and shared read-only for the lifetime of the process.

use std::fmt;

use axum::http::HeaderValue;
use lettre::message::Mailbox;
use serde::Deserialize;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is missing or could not be parsed (e.g. non-numeric `SMTP_PORT`).
    #[error("environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("{var} is not a valid mailbox: {value}")]
    InvalidMailbox { var: &'static str, value: String },

    #[error("allowed origin must be an exact origin header value: {0}")]
    InvalidOrigin(String),

    #[error("API_KEY must not be empty")]
    EmptyApiKey,

    /// The SMTP transport could not be constructed for the configured host.
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SMTP_SERVER` (required): SMTP relay host
/// - `SMTP_PORT` (required): implicit-TLS submission port, usually 465
/// - `EMAIL_SENDER` (required): sender address, also used as the SMTP username
/// - `EMAIL_RECEIVER` (required): address every submission is delivered to
/// - `EMAIL_PASSWORD` (required): SMTP password
/// - `API_KEY` (required): shared secret expected in the `x-api-key` header
/// - `ALLOWED_ORIGINS` (optional): comma-separated CORS allow-list
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3081
/// - `SENDER_NAME` (optional): display name of the sender, defaults to "Contact Form"
/// - `SMTP_TIMEOUT_SECS` (optional): SMTP timeout, defaults to 10 seconds
#[derive(Clone, Deserialize)]
pub struct Config {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub email_sender: String,
    pub email_receiver: String,
    pub email_password: String,
    pub api_key: String,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default = "default_smtp_timeout")]
    pub smtp_timeout_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3081
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:4321".to_string(),
        "https://chrisandsonsllc.com".to_string(),
        "https://chris.gorombo.com".to_string(),
    ]
}

fn default_sender_name() -> String {
    "Contact Form".to_string()
}

fn default_smtp_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., SMTP_SERVER)
    /// - Environment variable values cannot be parsed into expected types
    /// - Addresses, origins or the API key fail the startup checks in [`Config::validated`]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // Field names are matched case-insensitively: smtp_server <- SMTP_SERVER
        envy::from_iter::<_, Config>(vars)?.validated()
    }

    /// Normalize the origin list and reject values that could only fail later at request time.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.allowed_origins = self
            .allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if self.api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        self.sender_mailbox()?;
        self.receiver_mailbox()?;
        self.origin_header_values()?;

        Ok(self)
    }

    /// `From` identity of every relayed message: `"{sender_name} <{email_sender}>"`.
    pub fn sender_mailbox(&self) -> Result<Mailbox, ConfigError> {
        let address = self
            .email_sender
            .parse()
            .map_err(|_| ConfigError::InvalidMailbox {
                var: "EMAIL_SENDER",
                value: self.email_sender.clone(),
            })?;

        Ok(Mailbox::new(Some(self.sender_name.clone()), address))
    }

    pub fn receiver_mailbox(&self) -> Result<Mailbox, ConfigError> {
        self.email_receiver
            .parse()
            .map_err(|_| ConfigError::InvalidMailbox {
                var: "EMAIL_RECEIVER",
                value: self.email_receiver.clone(),
            })
    }

    /// The CORS allow-list as header values, in configuration order.
    ///
    /// A `*` entry is rejected: the list must name exact origins because credentials
    /// are allowed.
    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                if origin == "*" {
                    return Err(ConfigError::InvalidOrigin(origin.clone()));
                }
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }
}

// Secrets never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("email_sender", &self.email_sender)
            .field("email_receiver", &self.email_receiver)
            .field("email_password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("allowed_origins", &self.allowed_origins)
            .field("server_port", &self.server_port)
            .field("sender_name", &self.sender_name)
            .field("smtp_timeout_secs", &self.smtp_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = [
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("EMAIL_SENDER", "website@example.com"),
            ("EMAIL_RECEIVER", "owner@example.com"),
            ("EMAIL_PASSWORD", "hunter2"),
            ("API_KEY", "secret-key"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (key, value) in extra {
            vars.retain(|(k, _)| k != key);
            vars.push((key.to_string(), value.to_string()));
        }
        vars
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();

        assert_eq!(config.smtp_server, "smtp.example.com");
        assert_eq!(config.smtp_port, 465);
        assert_eq!(config.server_port, 3081);
        assert_eq!(config.sender_name, "Contact Form");
        assert_eq!(config.smtp_timeout_secs, 10);
        assert_eq!(config.allowed_origins.len(), 3);
        assert!(
            config
                .allowed_origins
                .contains(&"http://localhost:4321".to_string())
        );
    }

    #[test]
    fn splits_and_trims_allowed_origins() {
        let config = Config::from_vars(vars(&[(
            "ALLOWED_ORIGINS",
            "https://a.example, https://b.example,",
        )]))
        .unwrap();

        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn non_numeric_port_is_fatal() {
        let result = Config::from_vars(vars(&[("SMTP_PORT", "smtps")]));

        assert!(matches!(result, Err(ConfigError::Env(_))));
    }

    #[test]
    fn missing_smtp_server_is_fatal() {
        let mut vars = vars(&[]);
        vars.retain(|(k, _)| k != "SMTP_SERVER");

        assert!(matches!(
            Config::from_vars(vars),
            Err(ConfigError::Env(_))
        ));
    }

    #[test]
    fn rejects_empty_api_key() {
        let result = Config::from_vars(vars(&[("API_KEY", "")]));

        assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn rejects_wildcard_origin() {
        for origins in ["*", "https://a.example,*"] {
            let result = Config::from_vars(vars(&[("ALLOWED_ORIGINS", origins)]));

            assert!(
                matches!(result, Err(ConfigError::InvalidOrigin(ref origin)) if origin == "*"),
                "{origins}"
            );
        }
    }

    #[test]
    fn rejects_origin_that_is_not_a_header_value() {
        let result = Config::from_vars(vars(&[("ALLOWED_ORIGINS", "https://a\u{1}example")]));

        assert!(matches!(result, Err(ConfigError::InvalidOrigin(_))));
    }

    #[test]
    fn rejects_invalid_receiver() {
        let result = Config::from_vars(vars(&[("EMAIL_RECEIVER", "not an address")]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidMailbox {
                var: "EMAIL_RECEIVER",
                ..
            })
        ));
    }

    #[test]
    fn sender_mailbox_carries_display_name() {
        let config = Config::from_vars(vars(&[("SENDER_NAME", "Website")])).unwrap();
        let mailbox = config.sender_mailbox().unwrap();

        assert_eq!(mailbox.name.as_deref(), Some("Website"));
        assert_eq!(mailbox.email.to_string(), "website@example.com");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_vars(vars(&[])).unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("smtp.example.com"));
    }
}
