//! Profile lookup and registration.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use super::extract::json_body;
use crate::records::{NewRegistration, UserView};

/// `GET /api/users/{id}`: 404 means "not registered yet".
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.records.get_user(&id).await?;
    Ok(Json(json!({ "user": UserView::from(user) })))
}

/// `POST /api/users` with `{userId, displayName, role?, targetWeight?, height?}`.
pub async fn register_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let reg = NewRegistration::from_json(&json_body(&body)?)?;
    let user = state.records.register_user(&reg).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": UserView::from(user) })),
    ))
}
