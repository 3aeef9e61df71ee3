use teamweight_core::SnapshotPolicy;
use teamweight_core::db::unix_timestamp_millis;
use tracing::{info, instrument, warn};

use crate::storage::{MAX_LIST_LIMIT, NewProfile, TeamDatabase, UserProfile, WeightRecord};

use super::RecordError;
use super::validate::{NewRegistration, Role, SubmitWeight, TargetWeight};

/// Result of a successful weight submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub record: WeightRecord,
    /// `false` only under [`SnapshotPolicy::LatestDate`] for a backfill.
    pub snapshot_updated: bool,
}

/// Record upsert and profile operations over [`TeamDatabase`].
#[derive(Clone)]
pub struct RecordService {
    db: TeamDatabase,
    policy: SnapshotPolicy,
}

impl RecordService {
    pub const fn new(db: TeamDatabase, policy: SnapshotPolicy) -> Self {
        Self { db, policy }
    }

    pub const fn db(&self) -> &TeamDatabase {
        &self.db
    }

    /// Write the day's record and refresh the profile snapshot atomically.
    #[instrument(skip(self, req), fields(user_id = %req.user_id(), date = %req.date()))]
    pub async fn submit_weight(&self, req: &SubmitWeight) -> Result<SubmitOutcome, RecordError> {
        let date = req.date_key();
        let recorded_at = unix_timestamp_millis();

        let snapshot_updated = self
            .db
            .record_weight(req.user_id(), &date, req.weight(), recorded_at, self.policy)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to save weight");
                RecordError::from(e)
            })?;

        info!(weight = req.weight(), snapshot_updated, "Weight saved");

        Ok(SubmitOutcome {
            record: WeightRecord {
                user_id: req.user_id().to_string(),
                date,
                weight: req.weight(),
                recorded_at,
            },
            snapshot_updated,
        })
    }

    /// Records newest date first, at most 100. Store failures yield an
    /// empty list.
    #[instrument(skip(self))]
    pub async fn list_weights(&self, user_id: Option<&str>, limit: Option<u32>) -> Vec<WeightRecord> {
        let limit = limit.unwrap_or(MAX_LIST_LIMIT);
        match self.db.list_weights(user_id, limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to fetch weights, returning empty list");
                Vec::new()
            }
        }
    }

    /// Overwrite a profile's target weight; nothing else is touched.
    #[instrument(skip(self, req), fields(user_id = %req.user_id))]
    pub async fn set_target_weight(&self, req: &TargetWeight) -> Result<(), RecordError> {
        let updated = self
            .db
            .update_target_weight(&req.user_id, req.target_weight)
            .await?;
        if !updated {
            return Err(RecordError::NotFound(format!("User {}", req.user_id)));
        }
        info!(target_weight = req.target_weight, "Target weight updated");
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserProfile, RecordError> {
        Ok(self.db.get_user(user_id).await?)
    }

    /// Register a profile, completing an implicit one if it exists.
    #[instrument(skip(self, reg), fields(user_id = %reg.user_id, role = reg.role.as_str()))]
    pub async fn register_user(&self, reg: &NewRegistration) -> Result<UserProfile, RecordError> {
        let written = self
            .db
            .register_profile(&NewProfile {
                id: &reg.user_id,
                display_name: &reg.display_name,
                role: reg.role.as_str(),
                target_weight: reg.target_weight,
                height: reg.height,
            })
            .await?;

        if !written {
            return Err(RecordError::AlreadyRegistered(reg.user_id.clone()));
        }

        info!("User registered");
        self.get_user(&reg.user_id).await
    }

    /// Every player profile. Store failures yield an empty list.
    pub async fn list_players(&self) -> Vec<UserProfile> {
        match self.db.list_users_by_role(Role::Player.as_str()).await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Failed to fetch players, returning empty list");
                Vec::new()
            }
        }
    }

    /// LINE ids of every player, for reminder fan-out.
    ///
    /// Unlike [`Self::list_players`] this propagates store failures so a
    /// reminder run is not mistaken for "no players".
    pub async fn player_recipients(&self) -> Result<Vec<String>, RecordError> {
        let users = self.db.list_users_by_role(Role::Player.as_str()).await?;
        Ok(users.into_iter().map(|u| u.id).collect())
    }
}
