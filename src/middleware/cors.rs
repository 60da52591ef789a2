//! CORS policy for browser clients.
//!
//! Only origins on the configured allow-list get `Access-Control-Allow-Origin`
//! back. Methods and headers are mirrored from the request, which is how a `*`
//! wildcard has to be expressed once credentials are allowed.

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{Config, ConfigError};

/// Build the CORS layer from the configured allow-list.
///
/// The layer answers pre-flight requests itself, so it must wrap the API key gate.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, ConfigError> {
    let origins = config.origin_header_values()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
