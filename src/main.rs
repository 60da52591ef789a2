//! Contact Relay - Main Application Entry Point
//!
//! A small REST service that accepts contact-form submissions from a website and relays
//! each one as a plaintext email through an SMTP server.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Email**: lettre over implicit TLS with username/password authentication
//! - **Authentication**: shared static API key in the `x-api-key` header
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the SMTP transport
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port and serve until SIGINT/SIGTERM

mod app;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{app::AppState, services::mailer::SmtpMailer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting the application...");

    // Missing or malformed settings abort startup here
    let config = Arc::new(config::Config::from_env()?);
    tracing::info!(
        smtp_server = %config.smtp_server,
        smtp_port = config.smtp_port,
        allowed_origins = ?config.allowed_origins,
        "Configuration loaded"
    );

    let mailer = SmtpMailer::new(&config)?;

    let app = app::build_router(AppState {
        config: config.clone(),
        mailer: Arc::new(mailer),
    })?;

    // Bind to all interfaces on the configured port
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Requests are handled concurrently by tokio until a shutdown signal arrives
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
