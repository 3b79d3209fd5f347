//! HTTP Gateway Transport Implementation
//!
//! Drives an external messaging bridge that owns the real messaging session.
//! The bridge exposes a small JSON API:
//!
//! - `POST {base}/session/start` starts (or resumes) the session
//! - `GET {base}/session/status` returns `{"ready": bool}`
//! - `POST {base}/session/stop` tears the session down
//! - `POST {base}/messages` with `{"to", "text"}` sends a message
//!
//! Readiness that arrives later, session loss and inbound messages are pushed
//! by the bridge to the API's transport webhook, which feeds the same event
//! channel this transport writes to.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use otp_core::errors::TransportError;
use otp_core::services::transport::{EventSink, Transport};
use otp_shared::config::TransportConfig;
use otp_shared::recipient::mask_recipient;

use crate::InfrastructureError;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL of the bridge, without a trailing slash
    pub base_url: Url,
    /// Bearer token sent on every request
    pub token: String,
    /// Timeout for a single request
    pub request_timeout: Duration,
}

impl TryFrom<&TransportConfig> for HttpGatewayConfig {
    type Error = InfrastructureError;

    fn try_from(config: &TransportConfig) -> Result<Self, Self::Error> {
        let raw = config.gateway_url.as_deref().ok_or_else(|| {
            InfrastructureError::Config("TRANSPORT_GATEWAY_URL not set".to_string())
        })?;
        let base_url = Url::parse(raw.trim_end_matches('/')).map_err(|e| {
            InfrastructureError::Transport(format!("Invalid gateway URL '{}': {}", raw, e))
        })?;

        // The token also guards the event webhook the gateway pushes to
        let token = config.gateway_token.clone().ok_or_else(|| {
            InfrastructureError::Config("TRANSPORT_GATEWAY_TOKEN not set".to_string())
        })?;

        Ok(Self {
            base_url,
            token,
            request_timeout: config.request_timeout(),
        })
    }
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionStatus {
    #[serde(default)]
    ready: bool,
}

/// Transport backed by an HTTP messaging bridge
pub struct HttpGatewayTransport {
    client: Client,
    config: HttpGatewayConfig,
    events: EventSink,
}

impl HttpGatewayTransport {
    pub fn new(config: HttpGatewayConfig, events: EventSink) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        info!(gateway = %config.base_url, "HTTP gateway transport configured");

        Ok(Self {
            client,
            config,
            events,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.as_str().trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.config.token)
    }

    /// Send a request and map any failure onto the transport taxonomy
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, TransportError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| classify_request_error(what, &e))?;

        match classify_status(response.status()) {
            None => Ok(response),
            Some(err) => {
                debug!(what, status = %response.status(), "Gateway rejected request");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpGatewayTransport {
    fn name(&self) -> &str {
        "HttpGateway"
    }

    async fn initialize(&self) -> Result<(), TransportError> {
        self.execute(self.client.post(self.endpoint("/session/start")), "session start")
            .await?;

        let status: SessionStatus = self
            .execute(self.client.get(self.endpoint("/session/status")), "session status")
            .await?
            .json()
            .await
            .map_err(|e| TransportError::transient(format!("malformed session status: {}", e)))?;

        if status.ready {
            self.events.ready();
        } else {
            info!("Gateway session started, waiting for authentication");
        }
        Ok(())
    }

    async fn destroy(&self) -> Result<(), TransportError> {
        self.execute(self.client.post(self.endpoint("/session/stop")), "session stop")
            .await?;
        Ok(())
    }

    async fn send_message(&self, recipient_key: &str, text: &str) -> Result<(), TransportError> {
        let request = self
            .client
            .post(self.endpoint("/messages"))
            .json(&OutboundMessage { to: recipient_key, text });

        match self.execute(request, "send message").await {
            Ok(_) => {
                debug!(recipient = %mask_recipient(recipient_key), "Gateway accepted message");
                Ok(())
            }
            Err(err) => {
                warn!(
                    recipient = %mask_recipient(recipient_key),
                    error = %err,
                    "Gateway send failed"
                );
                Err(err)
            }
        }
    }
}

/// Map a gateway response status onto a transport failure.
///
/// `None` means success. Unauthorised, conflict and gone mean the bridge has
/// no usable session; throttling and server errors are worth retrying as is.
pub fn classify_status(status: StatusCode) -> Option<TransportError> {
    if status.is_success() {
        return None;
    }

    let err = match status {
        StatusCode::UNAUTHORIZED | StatusCode::CONFLICT | StatusCode::GONE => {
            TransportError::session_lost(format!("gateway responded {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => TransportError::transient("gateway is throttling"),
        s if s.is_server_error() => TransportError::transient(format!("gateway responded {}", s)),
        s => TransportError::transient(format!("gateway rejected request with {}", s)),
    };
    Some(err)
}

/// Map a request that never produced a response
pub fn classify_request_error(what: &str, err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::transient(format!("{} timed out", what))
    } else if err.is_connect() {
        TransportError::session_lost(format!("{}: gateway unreachable", what))
    } else {
        TransportError::transient(format!("{} failed: {}", what, err))
    }
}
