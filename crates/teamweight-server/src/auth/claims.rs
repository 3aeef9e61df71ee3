//! JWT claims carried by admin session tokens.

use serde::{Deserialize, Serialize};

/// `token_type` value stamped on admin sessions.
pub const ADMIN_TOKEN_TYPE: &str = "admin";

/// Claims embedded in an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject; always `"admin"` for the shared operator session.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    pub token_type: String,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.token_type == ADMIN_TOKEN_TYPE
    }
}
