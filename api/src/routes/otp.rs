//! OTP issuance and verification endpoints

use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_shared::recipient::{canonical_recipient, mask_recipient};

use crate::dto::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::ApiError;
use crate::state::AppState;

/// Handler for POST /send-otp
///
/// # Request Body
///
/// ```json
/// {
///     "recipientKey": "15551234567",
///     "notifyTarget": "https://example.com/verified"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully",
///     "recipientKey": "15551234567@c.us",
///     "expiresAt": "2025-08-14T10:05:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 when the recipient is missing or malformed
/// - 503 when the transport could not deliver the code
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let recipient_key = canonical_recipient(&request.recipient_key, &state.recipient_suffix)?;
    tracing::info!(
        recipient = %mask_recipient(&recipient_key),
        has_notify_target = request.notify_target.is_some(),
        "Processing send-otp request"
    );

    let challenge = state
        .delivery
        .issue_and_send(&recipient_key, request.notify_target, state.otp_ttl)
        .await?;

    Ok(HttpResponse::Ok().json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        recipient_key: challenge.recipient_key,
        expires_at: challenge.expires_at,
    }))
}

/// Handler for POST /verify-otp
///
/// 200 with `{"success": true}` on a match, 400 with
/// `{"success": false, "message": "Invalid OTP or expired"}` otherwise.
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let recipient_key = canonical_recipient(&request.recipient_key, &state.recipient_suffix)?;
    state
        .verification
        .verify_explicit(&recipient_key, &request.code)
        .await?;

    Ok(HttpResponse::Ok().json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}
