//! teamweight Server Library
//!
//! Core functionality for the team weight tracker:
//! - `SQLite` storage for user profiles and daily weight records
//! - Weight record upsert with the profile's last-weight snapshot
//! - Admin session tokens and password verification
//! - LINE Messaging API client and webhook signature checks
//! - Chunked reminder fan-out
//! - axum HTTP routes

pub mod auth;
pub mod line;
pub mod notifications;
pub mod records;
pub mod routes;
pub mod storage;
