//! `x-line-signature` verification.
//!
//! The signature is base64(HMAC-SHA256(channel secret, raw request body)).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature LINE would send for `body`.
pub fn sign(channel_secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check `signature` against `body` in constant time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"destination":"U0","events":[]}"#;

    #[test]
    fn signed_body_verifies() {
        let sig = sign("channel-secret", BODY).unwrap();
        assert!(verify_signature("channel-secret", BODY, &sig));
    }

    #[test]
    fn tampered_body_fails() {
        let sig = sign("channel-secret", BODY).unwrap();
        assert!(!verify_signature("channel-secret", b"{\"events\":[{}]}", &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign("other-secret", BODY).unwrap();
        assert!(!verify_signature("channel-secret", BODY, &sig));
    }

    #[test]
    fn non_base64_signature_fails() {
        assert!(!verify_signature("channel-secret", BODY, "%%%not-base64"));
    }
}
