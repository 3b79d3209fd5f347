//! CORS middleware configuration for cross-origin requests.
//!
//! Development, or an empty `ALLOWED_ORIGINS`, accepts any origin. Otherwise
//! only the configured origins may call the API from a browser.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use otp_shared::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given configuration
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if environment.is_development() || config.allows_any_origin() {
        tracing::info!(%environment, "Configuring permissive CORS");
        return cors.allow_any_origin();
    }

    config.allowed_origins.iter().fold(cors, |cors, origin| {
        tracing::info!(origin = %origin, "Adding allowed origin");
        cors.allowed_origin(origin)
    })
}
