//! Weight record queries.

use teamweight_core::SnapshotPolicy;

use super::db::TeamDatabase;
use super::models::WeightRecord;
use teamweight_core::db::DatabaseError;

/// Upper bound on rows returned by [`TeamDatabase::list_weights`].
pub const MAX_LIST_LIMIT: u32 = 100;

impl TeamDatabase {
    // =========================================================================
    // Weight queries
    // =========================================================================

    /// Write the record at (`user_id`, `date`) and refresh the profile snapshot.
    ///
    /// Both writes share one transaction. The profile row is created if it
    /// does not exist. Returns whether the snapshot was updated, which is
    /// always `true` under [`SnapshotPolicy::WriteOrder`].
    pub async fn record_weight(
        &self,
        user_id: &str,
        date: &str,
        weight: f64,
        recorded_at: i64,
        policy: SnapshotPolicy,
    ) -> Result<bool, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO weights (user_id, date, weight, recorded_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(user_id, date) DO UPDATE SET weight = excluded.weight, recorded_at = excluded.recorded_at",
        )
        .bind(user_id)
        .bind(date)
        .bind(weight)
        .bind(recorded_at)
        .execute(&mut *tx)
        .await?;

        let snapshot_sql = match policy {
            SnapshotPolicy::WriteOrder => {
                "INSERT INTO users (id, last_weight, last_recorded_at, last_recorded_date) VALUES (?, ?, ?, ?) \
                 ON CONFLICT(id) DO UPDATE SET last_weight = excluded.last_weight, \
                 last_recorded_at = excluded.last_recorded_at, last_recorded_date = excluded.last_recorded_date"
            }
            SnapshotPolicy::LatestDate => {
                "INSERT INTO users (id, last_weight, last_recorded_at, last_recorded_date) VALUES (?, ?, ?, ?) \
                 ON CONFLICT(id) DO UPDATE SET last_weight = excluded.last_weight, \
                 last_recorded_at = excluded.last_recorded_at, last_recorded_date = excluded.last_recorded_date \
                 WHERE users.last_recorded_date IS NULL OR excluded.last_recorded_date >= users.last_recorded_date"
            }
        };

        let result = sqlx::query(snapshot_sql)
            .bind(user_id)
            .bind(weight)
            .bind(recorded_at)
            .bind(date)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the record at (`user_id`, `date`), if any.
    pub async fn get_weight(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<WeightRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, WeightRecord>(
            "SELECT * FROM weights WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.pool())
        .await?;

        Ok(record)
    }

    /// List records newest date first, optionally for one user.
    ///
    /// `limit` is clamped to `1..=MAX_LIST_LIMIT`.
    pub async fn list_weights(
        &self,
        user_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<WeightRecord>, DatabaseError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);

        let records = if let Some(user_id) = user_id {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weights WHERE user_id = ? ORDER BY date DESC LIMIT ?",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, WeightRecord>(
                "SELECT * FROM weights ORDER BY date DESC, recorded_at DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(self.pool())
            .await?
        };

        Ok(records)
    }

    /// Count records, optionally for one user.
    pub async fn count_weights(&self, user_id: Option<&str>) -> Result<i64, DatabaseError> {
        let row: (i64,) = if let Some(user_id) = user_id {
            sqlx::query_as("SELECT COUNT(*) FROM weights WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.pool())
                .await?
        } else {
            sqlx::query_as("SELECT COUNT(*) FROM weights")
                .fetch_one(self.pool())
                .await?
        };

        Ok(row.0)
    }
}
