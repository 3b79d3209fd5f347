//! Webhook for gateways that push their session events over HTTP

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use constant_time_eq::constant_time_eq;

use otp_core::services::transport::TransportEvent;

use crate::handlers::ApiError;
use crate::state::AppState;

/// Handler for POST /transport/events
///
/// Accepts `{"type":"ready"}`, `{"type":"session_lost","reason":"..."}` or
/// `{"type":"message","recipientKey":"...","text":"..."}` and forwards it to
/// the session manager as if the transport had raised it in process. The
/// request must carry the configured gateway token; without one configured
/// every request is refused.
pub async fn transport_event(
    req: HttpRequest,
    state: web::Data<AppState>,
    event: web::Json<TransportEvent>,
) -> Result<HttpResponse, ApiError> {
    let authorized = state
        .gateway_token
        .as_deref()
        .is_some_and(|expected| bearer_matches(&req, expected));
    if !authorized {
        tracing::warn!("Rejected transport event with missing or bad credentials");
        return Err(ApiError::Unauthorized);
    }

    let event = event.into_inner();
    tracing::debug!(kind = event_kind(&event), "Transport event received over webhook");
    if !state.events.emit(event) {
        return Err(ApiError::EventsClosed);
    }

    Ok(HttpResponse::Accepted().json(serde_json::json!({ "accepted": true })))
}

fn bearer_matches(req: &HttpRequest, expected: &str) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| constant_time_eq(token.trim().as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}

// Inbound message text stays out of the logs
fn event_kind(event: &TransportEvent) -> &'static str {
    match event {
        TransportEvent::Ready => "ready",
        TransportEvent::SessionLost { .. } => "session_lost",
        TransportEvent::InboundMessage { .. } => "message",
    }
}
