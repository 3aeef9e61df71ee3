//! `teamweight` Core Library
//!
//! Shared functionality for the team weight tracker:
//! - Configuration resolution and hierarchy
//! - `SQLite` pool helpers and the `define_database!` macro
//! - Tracing initialization
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod tracing_init;

pub use config::{Config, SnapshotPolicy};
pub use error::{Error, Result};
