//! LINE webhook receiver.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::AppState;
use super::error::ApiError;
use super::extract::json_body;
use crate::line::verify_signature;

/// `POST /api/webhook`: verify `x-line-signature`, then acknowledge.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let Some(secret) = state.config.line.channel_secret.as_deref() else {
        error!("LINE channel secret is not set");
        return Err(ApiError::Internal("LINE channel secret is not set".into()));
    };

    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_signature(secret, &body, signature) {
        warn!("Invalid webhook signature");
        return Err(ApiError::Unauthorized("Invalid signature".into()));
    }

    let payload = json_body(&body)?;
    let events = payload
        .get("events")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for event in events {
        info!(
            event_type = event.get("type").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
            source = %event.get("source").unwrap_or(&serde_json::Value::Null),
            "Received webhook event"
        );
    }

    Ok(Json(json!({ "status": "ok" })))
}
