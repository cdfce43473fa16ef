//! Session token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Privilege level.
    pub role: Role,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Manages session token creation and validation.
///
/// Tokens are issued by the auth collaborator at sign-in; the gateway
/// only ever decodes them. `issue` exists for that collaborator and for
/// tests.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for the given user.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate a token and return its claims.
    ///
    /// Fails on bad signature, expiry, or garbage input. Callers treat
    /// any failure as "no token present".
    pub fn decode(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<SessionClaims>(
            token,
            &self.decoding_key,
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> SessionKeys {
        SessionKeys::new(b"test-secret-key-for-testing")
    }

    #[test]
    fn issue_and_decode() {
        let keys = test_keys();
        let token = keys
            .issue("user-1", "alice@example.com", Role::Admin, 3600)
            .unwrap();

        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_rejected() {
        let keys = test_keys();
        let token = keys
            .issue("user-1", "alice@example.com", Role::User, -120)
            .unwrap();
        assert!(keys.decode(&token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let keys = test_keys();
        let token = keys
            .issue("user-1", "alice@example.com", Role::User, 3600)
            .unwrap();

        let other = SessionKeys::new(b"a-different-secret-entirely");
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let keys = test_keys();
        assert!(keys.decode("not.a.token").is_err());
        assert!(keys.decode("").is_err());
    }
}
