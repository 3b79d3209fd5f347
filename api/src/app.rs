//! Application factory
//!
//! Registers routes and request-body handling. `create_app` adds the
//! middleware stack used by the server; tests can mount `configure` alone.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use tracing_actix_web::TracingLogger;

use otp_shared::{CorsConfig, Environment};

use crate::handlers::ApiError;
use crate::middleware::create_cors;
use crate::routes::{otp, status, transport_events};
use crate::state::AppState;

/// Register every route on a service config
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| ApiError::Validation(format!("Invalid request body: {}", err)).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(status::index))
        .route("/status", web::get().to(status::status))
        .route("/health", web::get().to(status::health))
        .route("/send-otp", web::post().to(otp::send_otp))
        .route("/verify-otp", web::post().to(otp::verify_otp))
        .default_service(web::route().to(status::not_found));
}

/// Register the gateway event webhook; only mounted when a gateway token is set
pub fn configure_transport_webhook(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/transport/events",
        web::post().to(transport_events::transport_event),
    );
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    cors: &CorsConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let webhook_enabled = state.gateway_token.is_some();

    App::new()
        .app_data(state)
        // Order matters: CORS runs inside the request span
        .wrap(create_cors(cors, environment))
        .wrap(TracingLogger::default())
        .configure(|cfg| {
            if webhook_enabled {
                configure_transport_webhook(cfg);
            }
        })
        .configure(configure)
}
