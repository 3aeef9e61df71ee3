//! JSON shapes returned by the HTTP layer.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::storage::{UserProfile, WeightRecord};

/// A weight record as returned by `GET /api/weights`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl From<WeightRecord> for WeightEntry {
    fn from(record: WeightRecord) -> Self {
        Self {
            id: record.id(),
            recorded_at: millis_to_rfc3339(record.recorded_at),
            user_id: record.user_id,
            weight: record.weight,
            date: record.date,
        }
    }
}

/// A profile as returned by the user and admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: String,
    /// The LINE user id; the profile id doubles as the push recipient.
    pub line_user_id: String,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub target_weight: Option<f64>,
    pub height: Option<f64>,
    pub last_weight: Option<f64>,
    pub last_recorded_at: Option<String>,
    pub last_recorded_date: Option<String>,
    pub joined_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<UserProfile> for UserView {
    fn from(user: UserProfile) -> Self {
        Self {
            line_user_id: user.id.clone(),
            id: user.id,
            display_name: user.display_name,
            role: user.role,
            target_weight: user.target_weight,
            height: user.height,
            last_weight: user.last_weight,
            last_recorded_at: user.last_recorded_at.and_then(millis_to_rfc3339),
            last_recorded_date: user.last_recorded_date,
            joined_at: user.joined_at.and_then(millis_to_rfc3339),
            updated_at: user.updated_at.and_then(millis_to_rfc3339),
        }
    }
}

fn millis_to_rfc3339(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
