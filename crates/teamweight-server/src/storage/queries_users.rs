//! User profile queries.

use teamweight_core::db::{DatabaseError, unix_timestamp_millis};

use super::db::TeamDatabase;
use super::models::UserProfile;

/// Parameters for registering a profile.
pub struct NewProfile<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub target_weight: Option<f64>,
    pub height: Option<f64>,
}

impl TeamDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Register a profile.
    ///
    /// An implicit profile (no role yet) is completed in place and keeps its
    /// last-weight snapshot. Returns `false` without writing if the profile
    /// is already registered.
    pub async fn register_profile(&self, params: &NewProfile<'_>) -> Result<bool, DatabaseError> {
        let now = unix_timestamp_millis();

        let result = sqlx::query(
            "INSERT INTO users (id, display_name, role, target_weight, height, joined_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name, role = excluded.role, \
             target_weight = excluded.target_weight, height = excluded.height, joined_at = excluded.joined_at \
             WHERE users.role IS NULL",
        )
        .bind(params.id)
        .bind(params.display_name)
        .bind(params.role)
        .bind(params.target_weight)
        .bind(params.height)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a profile by ID.
    pub async fn get_user(&self, id: &str) -> Result<UserProfile, DatabaseError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// List profiles with the given role.
    pub async fn list_users_by_role(&self, role: &str) -> Result<Vec<UserProfile>, DatabaseError> {
        let users = sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM users WHERE role = ? ORDER BY joined_at ASC, id ASC",
        )
        .bind(role)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    /// Overwrite a profile's target weight.
    ///
    /// Returns `false` if no profile has this ID.
    pub async fn update_target_weight(
        &self,
        id: &str,
        target_weight: f64,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp_millis();

        let result = sqlx::query("UPDATE users SET target_weight = ?, updated_at = ? WHERE id = ?")
            .bind(target_weight)
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
