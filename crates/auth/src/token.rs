//! Token Service: signs and verifies HS256 session tokens.
//!
//! Expiry is the only invalidation path. Logging out clears the cookie on the
//! client; a copied bearer token stays valid until `exp`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use dealerhub_core::Clock;

use crate::{Role, SessionClaims, TokenValidationError, validate_claims};

/// Fixed session lifetime.
pub const SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenValidationError> for TokenError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => TokenError::Expired,
            TokenValidationError::NotYetValid | TokenValidationError::InvalidTimeWindow => TokenError::Invalid,
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(SESSION_TTL_HOURS),
            clock,
        }
    }

    /// Build claims for `sub` starting now.
    pub fn claims_for(&self, sub: impl Into<String>, role: Role, username: impl Into<String>) -> SessionClaims {
        let now = self.clock.now();
        SessionClaims::new(sub, role, username, now, now + self.ttl)
    }

    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and time window against the injected clock.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Expiry is checked against our clock, not the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
