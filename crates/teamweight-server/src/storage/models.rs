//! Data models for teamweight storage.

use serde::{Deserialize, Serialize};

/// A row of the `users` table.
///
/// `display_name` and `role` are `None` for a profile that was created
/// implicitly by a weight submission and has not registered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub target_weight: Option<f64>,
    pub height: Option<f64>,
    pub last_weight: Option<f64>,
    /// Unix milliseconds of the write that produced `last_weight`.
    pub last_recorded_at: Option<i64>,
    /// Calendar date of the record `last_weight` came from.
    pub last_recorded_date: Option<String>,
    pub joined_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// A row of the `weights` table, keyed by (`user_id`, `date`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeightRecord {
    pub user_id: String,
    pub date: String,
    pub weight: f64,
    /// Unix milliseconds of the last write to this key.
    pub recorded_at: i64,
}

impl WeightRecord {
    /// Stable document id, `{user_id}_{date}`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.user_id, self.date)
    }
}
