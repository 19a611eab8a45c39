use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Session claims model (transport-agnostic).
///
/// Not persisted: the identity of every request is rebuilt from these claims.
/// Timestamps are unix seconds so the encoded form is a standard JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject id: the dealer id, or the fixed admin subject.
    pub sub: String,

    pub role: Role,

    pub username: String,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiration, unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(sub: impl Into<String>, role: Role, username: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: sub.into(),
            role,
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims against `now`.
///
/// Signature verification happens in [`crate::TokenService`]; this only checks
/// the time window.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims_at(now: DateTime<Utc>) -> SessionClaims {
        SessionClaims::new("d-1", Role::Dealer, "d1", now, now + Duration::hours(12))
    }

    #[test]
    fn accepts_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims_at(now), now), Ok(()));
        assert_eq!(validate_claims(&claims_at(now), now + Duration::hours(11)), Ok(()));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let claims = claims_at(now);
        assert_eq!(
            validate_claims(&claims, now + Duration::hours(12)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_future_and_inverted_windows() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims_at(now + Duration::minutes(5)), now),
            Err(TokenValidationError::NotYetValid)
        );

        let inverted = SessionClaims::new("x", Role::Admin, "admin", now, now);
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
