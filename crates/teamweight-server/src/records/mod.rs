//! Weight record upsert service.
//!
//! Owns the rule that each (user, date) has exactly one record and that the
//! profile's last-weight snapshot is refreshed on every write. Everything
//! that touches `last_weight` goes through [`RecordService::submit_weight`].

mod service;
mod validate;
mod views;


pub use service::{RecordService, SubmitOutcome};
pub use validate::{NewRegistration, Role, SubmitWeight, TargetWeight, ValidationError};
pub use views::{UserView, WeightEntry};

use teamweight_core::db::DatabaseError;

/// Errors returned by the record service.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Input was rejected before any write.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No profile exists for this user.
    #[error("User not found: {0}")]
    NotFound(String),

    /// The profile already has a role.
    #[error("User already registered: {0}")]
    AlreadyRegistered(String),

    /// The store rejected or could not serve the request.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DatabaseError> for RecordError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            other => Self::Database(other.to_string()),
        }
    }
}
