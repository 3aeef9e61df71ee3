//! Messaging API HTTP client.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::{Message, Messenger, NotificationError};

/// Request body for `POST /v2/bot/message/push`.
#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    pub to: &'a str,
    pub messages: &'a [Message],
}

/// Request body for `POST /v2/bot/message/multicast`.
#[derive(Debug, Serialize)]
pub struct MulticastRequest<'a> {
    pub to: &'a [String],
    pub messages: &'a [Message],
}

/// Client for the LINE Messaging API.
#[derive(Debug)]
pub struct LineClient {
    http: reqwest::Client,
    api_base: String,
    /// Channel access token. When `None` every call fails with
    /// [`NotificationError::NotConfigured`].
    access_token: Option<String>,
}

impl LineClient {
    /// Create a client against `api_base` (normally `https://api.line.me`).
    pub fn new(api_base: &str, access_token: Option<String>) -> Result<Self, NotificationError> {
        // reqwest is built with rustls-no-provider; Err means already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NotificationError::Request(e.to_string()))?;

        if access_token.is_none() {
            warn!("No LINE channel access token configured; push messages are disabled");
        }

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<(), NotificationError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(NotificationError::NotConfigured)?;

        let response = self
            .http
            .post(self.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| NotificationError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(path, "LINE request succeeded");
            Ok(())
        } else {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            warn!(status = status_code, body = %body, "LINE API returned error");
            Err(NotificationError::ApiError {
                status: status_code,
                body,
            })
        }
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn push(&self, to: &str, messages: &[Message]) -> Result<(), NotificationError> {
        self.post("/v2/bot/message/push", &PushRequest { to, messages })
            .await
    }

    async fn multicast(
        &self,
        to: &[String],
        messages: &[Message],
    ) -> Result<(), NotificationError> {
        self.post("/v2/bot/message/multicast", &MulticastRequest { to, messages })
            .await
    }
}
