//! Signed session tokens.
//!
//! There is no server-side session store: a token is valid when its signature
//! checks out and it has not expired. Logging out only clears the cookie, so a
//! copied token keeps working until `exp`.

use crate::error::ApiError;
use chrono::{Duration, Utc};
use common::model::role::Role;
use common::model::user::Identity;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i64,
    code: String,
    username: String,
    role: Role,
    department: Option<String>,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        SessionKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a token for `identity`, valid for the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<String, ApiError> {
        let now = Utc::now();
        self.issue_at(identity, now.timestamp(), (now + self.ttl).timestamp())
    }

    fn issue_at(&self, identity: &Identity, iat: i64, exp: i64) -> Result<String, ApiError> {
        let claims = Claims {
            id: identity.id,
            code: identity.code.clone(),
            username: identity.username.clone(),
            role: identity.role,
            department: identity.department.clone(),
            iat,
            exp,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decodes and checks a token. Any failure, including expiry, is
    /// `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| ApiError::Unauthenticated("Invalid token."))?;
        let claims = data.claims;
        Ok(Identity {
            id: claims.id,
            code: claims.code,
            username: claims.username,
            role: claims.role,
            department: claims.department,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> Identity {
        Identity {
            id: 7,
            code: "E001".into(),
            username: "Test".into(),
            role: Role::Worker,
            department: Some("EDM".into()),
        }
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let keys = SessionKeys::new("secret", 24);
        let token = keys.issue(&worker()).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), worker());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("secret", 24);
        let past = Utc::now().timestamp() - 3600;
        let token = keys.issue_at(&worker(), past - 60, past).unwrap();
        assert!(matches!(
            keys.verify(&token),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new("other", 24).issue(&worker()).unwrap();
        assert!(SessionKeys::new("secret", 24).verify(&token).is_err());
        assert!(SessionKeys::new("secret", 24).verify("not-a-jwt").is_err());
    }
}
