//! Scheduled reminder trigger.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use subtle::ConstantTimeEq;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use super::extract::bearer_token;
use crate::notifications::{dispatch_reminder, reminder_message};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindQuery {
    /// Push a single test reminder to this user instead of all players.
    pub user_id: Option<String>,
}

/// `GET /api/cron/remind`, authorized by `Bearer {cron.secret}`.
pub async fn remind(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RemindQuery>,
) -> Result<Json<Value>, ApiError> {
    if !cron_authorized(state.config.cron.secret.as_deref(), bearer_token(&headers)) {
        return Err(ApiError::Unauthorized("Unauthorized".into()));
    }

    let message = reminder_message(state.config.line.liff_id.as_deref());

    if let Some(user_id) = query.user_id.filter(|id| !id.is_empty()) {
        info!(user_id = %user_id, "Sending test reminder");
        state
            .messenger
            .push(&user_id, std::slice::from_ref(&message))
            .await?;
        return Ok(Json(json!({
            "success": true,
            "message": format!("Test message sent to {user_id}"),
        })));
    }

    let recipients = state.records.player_recipients().await?;
    let report = dispatch_reminder(state.messenger.as_ref(), &recipients, &message).await;
    info!(players = recipients.len(), sent = report.sent, failed = report.failed, "Cron reminder executed");

    Ok(Json(json!({
        "success": report.is_complete(),
        "message": format!("Cron executed. Found {} players.", recipients.len()),
        "report": report,
    })))
}

/// Constant-time check of the presented bearer against the cron secret.
/// No configured secret means nobody is authorized.
fn cron_authorized(secret: Option<&str>, presented: Option<&str>) -> bool {
    match (secret, presented) {
        (Some(secret), Some(presented)) => {
            bool::from(secret.as_bytes().ct_eq(presented.as_bytes()))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cron_secret_must_match_exactly() {
        assert!(cron_authorized(Some("cron-secret"), Some("cron-secret")));
        assert!(!cron_authorized(Some("cron-secret"), Some("cron-secreT")));
        assert!(!cron_authorized(Some("cron-secret"), Some("cron-secret-longer")));
        assert!(!cron_authorized(Some("cron-secret"), None));
        assert!(!cron_authorized(None, Some("anything")));
    }
}
