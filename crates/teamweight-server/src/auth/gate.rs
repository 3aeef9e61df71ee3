use teamweight_core::config::AdminConfig;
use tracing::{info, warn};

use super::AuthError;
use super::claims::Claims;
use super::jwt::JwtManager;
use super::password;

/// Verifies the admin password and the session tokens it issues.
pub struct AdminGate {
    password_hash: Option<String>,
    jwt: JwtManager,
}

impl AdminGate {
    pub const fn new(password_hash: Option<String>, jwt: JwtManager) -> Self {
        Self { password_hash, jwt }
    }

    /// Build the gate from configuration.
    ///
    /// Without a configured `jwt_secret` a random per-process secret is used,
    /// so sessions do not survive a restart.
    pub fn from_config(config: &AdminConfig) -> Self {
        let secret = config.jwt_secret.clone().unwrap_or_else(|| {
            warn!("No admin JWT secret configured; sessions will not survive a restart");
            uuid::Uuid::new_v4().to_string()
        });
        if config.password_hash.is_none() {
            warn!("No admin password hash configured; admin login is disabled");
        }
        Self::new(
            config.password_hash.clone(),
            JwtManager::new(secret.as_bytes(), config.session_ttl_secs),
        )
    }

    /// Exchange the admin password for a session token and its TTL.
    pub fn login(&self, candidate: &str) -> Result<(String, i64), AuthError> {
        let phc = self.password_hash.as_deref().ok_or(AuthError::NotConfigured)?;

        let valid = password::verify_password(candidate, phc)
            .map_err(|e| AuthError::Internal(format!("Password verification failed: {e}")))?;
        if !valid {
            warn!("Failed admin login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self
            .jwt
            .issue_admin_token()
            .map_err(|e| AuthError::Internal(format!("Token creation failed: {e}")))?;
        info!("Admin logged in");
        Ok(issued)
    }

    /// Check a bearer token presented on an admin request.
    pub fn verify_session(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self
            .jwt
            .validate(token)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;
        if !claims.is_admin() {
            return Err(AuthError::InvalidSession("not an admin session".into()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdminGate {
        let hash = password::hash_password("team-pass").unwrap();
        AdminGate::new(Some(hash), JwtManager::new(b"gate-secret", 600))
    }

    #[test]
    fn login_issues_verifiable_session() {
        let gate = gate();
        let (token, ttl) = gate.login("team-pass").unwrap();
        assert_eq!(ttl, 600);
        assert!(gate.verify_session(&token).unwrap().is_admin());
    }

    #[test]
    fn wrong_password_is_rejected() {
        assert!(matches!(
            gate().login("guess"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn unconfigured_gate_refuses_login() {
        let gate = AdminGate::new(None, JwtManager::new(b"gate-secret", 600));
        assert!(matches!(gate.login("anything"), Err(AuthError::NotConfigured)));
    }

    #[test]
    fn session_from_another_secret_is_rejected() {
        let (token, _) = JwtManager::new(b"elsewhere", 600).issue_admin_token().unwrap();
        assert!(matches!(
            gate().verify_session(&token),
            Err(AuthError::InvalidSession(_))
        ));
    }

    #[test]
    fn from_config_without_secret_still_round_trips() {
        let config = AdminConfig {
            password_hash: Some(password::hash_password("pw").unwrap()),
            jwt_secret: None,
            session_ttl_secs: 60,
        };
        let gate = AdminGate::from_config(&config);
        let (token, _) = gate.login("pw").unwrap();
        assert!(gate.verify_session(&token).is_ok());
    }
}
