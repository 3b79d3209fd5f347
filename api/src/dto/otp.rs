use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use otp_core::SessionPhase;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    /// Transport address, or a phone number in any common formatting
    /// Examples: "15551234567@c.us", "+1 (555) 123-4567"
    #[serde(default, alias = "phoneNumber")]
    #[validate(length(min = 1, message = "recipient is required"))]
    pub recipient_key: String,

    /// Callback URL told about a successful verification
    #[serde(default, alias = "callbackUrl")]
    #[validate(url(message = "notifyTarget must be a URL"))]
    pub notify_target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default, alias = "phoneNumber")]
    #[validate(length(min = 1, message = "recipient is required"))]
    pub recipient_key: String,

    /// The code the user received
    #[serde(default, alias = "otp")]
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    /// Canonical address the code was sent to
    pub recipient_key: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub transport: String,
    pub phase: SessionPhase,
    pub last_transition_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}
