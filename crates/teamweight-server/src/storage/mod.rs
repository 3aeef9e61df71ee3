//! SQLite storage for the teamweight server.
//!
//! Provides persistence for user profiles and daily weight records.

mod db;
mod models;
mod queries_users;
mod queries_weights;


pub use db::TeamDatabase;
pub use models::*;
pub use queries_users::NewProfile;
pub use queries_weights::MAX_LIST_LIMIT;
pub use teamweight_core::db::DatabaseError;
