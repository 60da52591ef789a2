//! Router assembly.
//!
//! Layer order, outermost first:
//! 1. Request tracing
//! 2. CORS (answers pre-flight requests, decorates every response)
//! 3. API key gate
//! 4. Routes

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{MethodRouter, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::{Config, ConfigError},
    handlers, middleware,
    services::mailer::Mailer,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
}

/// Build the HTTP application.
///
/// # Errors
///
/// Fails if an allowed origin cannot be used as a header value.
pub fn build_router(state: AppState) -> Result<Router, ConfigError> {
    let cors = middleware::cors::cors_layer(&state.config)?;

    let send_email: MethodRouter<AppState> = post(handlers::contact::send_email)
        .fallback(handlers::fallback::method_not_allowed);

    let app = Router::new()
        // Browsers and existing clients post with the trailing slash; accept both forms
        .route("/send-email/", send_email.clone())
        .route("/send-email", send_email)
        .fallback(handlers::fallback::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.config.clone(),
            middleware::api_key::require_api_key,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
