//! Admin session token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use teamweight_core::db::unix_timestamp;

use super::claims::{ADMIN_TOKEN_TYPE, Claims};

/// Signs and verifies admin session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &[u8], session_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            session_ttl_secs,
        }
    }

    /// Issue an admin session token. Returns the token and its TTL in seconds.
    pub fn issue_admin_token(&self) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let now = unix_timestamp();

        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: ADMIN_TOKEN_TYPE.to_string(),
            iat: now,
            exp: now + self.session_ttl_secs,
            token_type: ADMIN_TOKEN_TYPE.to_string(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, self.session_ttl_secs))
    }

    /// Validate signature and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtManager {
        JwtManager::new(b"test-secret-key-for-testing", 3600)
    }

    #[test]
    fn issue_and_validate_admin_token() {
        let jwt = test_jwt();
        let (token, ttl) = jwt.issue_admin_token().unwrap();
        assert_eq!(ttl, 3600);

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn garbage_token_fails() {
        assert!(test_jwt().validate("not-a-valid-token").is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let other = JwtManager::new(b"different-secret", 3600);
        let (token, _) = test_jwt().issue_admin_token().unwrap();
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn expired_token_fails() {
        // Past the default 60s leeway.
        let jwt = JwtManager::new(b"test-secret-key-for-testing", -600);
        let (token, _) = jwt.issue_admin_token().unwrap();
        assert!(jwt.validate(&token).is_err());
    }
}
