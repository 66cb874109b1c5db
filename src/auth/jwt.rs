//! JWT Token Handler
//! Mission: Issue and verify signed, time-limited session tokens

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::Role;

/// Signed token payload: the authenticated identity and nothing else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub role: Role,
    pub exp: usize, // expiration timestamp
}

/// JWT handler for token operations
pub struct JwtHandler {
    secret: String,
    ttl_hours: i64,
}

impl JwtHandler {
    /// Create a handler with the default 1-hour token lifetime
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl_hours: 1,
        }
    }

    pub fn with_ttl_hours(mut self, ttl_hours: i64) -> Self {
        self.ttl_hours = ttl_hours;
        self
    }

    /// Sign a token carrying `{userId, role}`
    pub fn generate_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: expiration,
        };

        debug!(user_id = %user_id, role = role.as_str(), ttl_hours = self.ttl_hours, "Issuing token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate JWT")
    }

    /// Verify a token; fails closed on any signature or expiry error
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_and_verification() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user_id = Uuid::new_v4();

        let token = handler.generate_token(user_id, Role::User).unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        assert!(handler.verify_token("invalid.token.here").is_err());
        assert!(handler.verify_token("").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = JwtHandler::new("secret1".to_string());
        let verifier = JwtHandler::new("secret2".to_string());

        let token = issuer.generate_token(Uuid::new_v4(), Role::Admin).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts exp in the past
        let handler = JwtHandler::new("test-secret".to_string()).with_ttl_hours(-2);

        let token = handler.generate_token(Uuid::new_v4(), Role::User).unwrap();
        assert!(handler.verify_token(&token).is_err());
    }

    #[test]
    fn test_role_travels_in_token() {
        let handler = JwtHandler::new("test-secret".to_string());

        for role in [Role::Admin, Role::User, Role::StoreOwner] {
            let token = handler.generate_token(Uuid::new_v4(), role).unwrap();
            assert_eq!(handler.verify_token(&token).unwrap().role, role);
        }
    }
}
