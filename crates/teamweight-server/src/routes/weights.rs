//! Player-facing weight endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use super::extract::json_body;
use crate::records::{SubmitWeight, WeightEntry};

/// `POST /api/weight` with `{userId, weight, date}`.
pub async fn submit_weight(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let req = SubmitWeight::from_json(&json_body(&body)?)?;
    let outcome = state.records.submit_weight(&req).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Weight saved successfully",
        "snapshotUpdated": outcome.snapshot_updated,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsQuery {
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

/// `GET /api/weights?userId=&limit=`
///
/// Never fails on a store error; the list is just empty. A malformed query
/// string is a 400.
pub async fn list_weights(
    State(state): State<AppState>,
    query: Result<Query<WeightsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::BadRequest(format!("Invalid query: {}", e.body_text())))?;
    let user_id = query.user_id.as_deref().filter(|id| !id.is_empty());
    let weights: Vec<WeightEntry> = state
        .records
        .list_weights(user_id, query.limit)
        .await
        .into_iter()
        .map(WeightEntry::from)
        .collect();

    Ok(Json(json!({ "weights": weights })))
}
