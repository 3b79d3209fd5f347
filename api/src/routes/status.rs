//! Service banner, readiness and health endpoints

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::dto::{HealthResponse, StatusResponse};
use crate::state::AppState;

const SERVICE_NAME: &str = "otp-relay";

/// Handler for GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "send_otp": {
                "path": "/send-otp",
                "method": "POST",
                "request_body": {
                    "recipientKey": "string (transport address or phone number)",
                    "notifyTarget": "string (optional callback URL)"
                },
                "responses": {
                    "200": "Code delivered",
                    "400": "Missing or invalid recipient",
                    "503": "Transport unavailable"
                }
            },
            "verify_otp": {
                "path": "/verify-otp",
                "method": "POST",
                "request_body": {
                    "recipientKey": "string",
                    "code": "string"
                },
                "responses": {
                    "200": "Code verified",
                    "400": "Invalid OTP or expired"
                }
            },
            "status": { "path": "/status", "method": "GET" },
            "health": { "path": "/health", "method": "GET" }
        }
    }))
}

/// Handler for GET /status
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        ready: state.session.is_ready(),
    })
}

/// Handler for GET /health
///
/// Liveness only; the process is healthy while the session reconnects.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.snapshot();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transport: state.session.transport_name().to_string(),
        phase: session.phase,
        last_transition_at: session.last_transition_at,
        timestamp: Utc::now(),
    })
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(crate::dto::ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
