//! LINE Messaging API support.
//!
//! Provides:
//! - [`LineClient`] for push and multicast calls
//! - the [`Messenger`] trait that reminder dispatch and routes send through
//! - webhook signature verification

pub mod client;
pub mod signature;

pub use client::LineClient;
pub use signature::verify_signature;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Most recipients LINE accepts in one multicast call.
pub const MULTICAST_MAX_RECIPIENTS: usize = 500;

/// A message object in the Messaging API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text { text: String },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Errors that can occur when talking to LINE.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// No channel access token is configured.
    #[error("LINE channel access token is not configured")]
    NotConfigured,

    /// HTTP request to the Messaging API failed.
    #[error("LINE request error: {0}")]
    Request(String),

    /// The Messaging API returned a non-success status code.
    #[error("LINE API error (status {status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Outbound push messaging.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send messages to a single user.
    async fn push(&self, to: &str, messages: &[Message]) -> Result<(), NotificationError>;

    /// Send the same messages to up to [`MULTICAST_MAX_RECIPIENTS`] users.
    async fn multicast(&self, to: &[String], messages: &[Message])
    -> Result<(), NotificationError>;
}
