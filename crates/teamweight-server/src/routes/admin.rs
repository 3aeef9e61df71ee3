//! Admin dashboard endpoints. Everything except login requires an
//! [`AdminSession`].

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::info;

use super::AppState;
use super::error::ApiError;
use super::extract::{AdminSession, json_body};
use crate::notifications::{dispatch_reminder, reminder_message};
use crate::records::{TargetWeight, UserView};

/// `POST /api/admin/login` with `{password}`.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let body = json_body(&body)?;
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("Invalid password".into()))?;

    let (token, expires_in) = state.gate.login(password)?;
    Ok(Json(json!({ "token": token, "expiresIn": expires_in })))
}

/// `GET /api/admin/users`: every player profile.
pub async fn list_players(_session: AdminSession, State(state): State<AppState>) -> Json<Value> {
    let users: Vec<UserView> = state
        .records
        .list_players()
        .await
        .into_iter()
        .map(UserView::from)
        .collect();
    Json(json!({ "users": users }))
}

/// `PATCH /api/admin/users` with `{userId, target_weight}`.
pub async fn update_target_weight(
    _session: AdminSession,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let req = TargetWeight::from_json(&json_body(&body)?)?;
    state.records.set_target_weight(&req).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully",
    })))
}

/// `POST /api/admin/notify`: remind every player now.
pub async fn notify_players(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let recipients = state.records.player_recipients().await?;
    if recipients.is_empty() {
        return Ok(Json(json!({
            "success": false,
            "message": "No players with LINE ID found.",
        })));
    }

    let message = reminder_message(state.config.line.liff_id.as_deref());
    let report = dispatch_reminder(state.messenger.as_ref(), &recipients, &message).await;
    info!(sent = report.sent, failed = report.failed, "Admin reminder dispatched");

    Ok(Json(json!({
        "success": report.is_complete(),
        "message": format!("Sent reminder to {} users.", report.sent),
        "report": report,
    })))
}
