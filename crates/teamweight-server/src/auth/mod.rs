//! Admin gate for teamweight.
//!
//! A shared operator password (stored as an argon2 PHC string) is exchanged
//! for a signed session token. Every admin request presents the token and it
//! is checked server-side.

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod password;

pub use claims::Claims;
pub use gate::AdminGate;
pub use jwt::JwtManager;

/// Errors from the admin gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No admin password is configured, so nobody can log in.
    #[error("Admin login is not configured")]
    NotConfigured,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token missing, malformed, expired or not an admin session.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Auth internal error: {0}")]
    Internal(String),
}
