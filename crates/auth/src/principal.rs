use dealerhub_core::DealerId;

use crate::admin::ADMIN_SUBJECT;
use crate::{Role, SessionClaims, TokenError};

/// Identity of an authenticated request, rebuilt from session claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Admin { username: String },
    Dealer { dealer_id: DealerId, username: String },
}

impl Identity {
    pub fn role(&self) -> Role {
        match self {
            Identity::Admin { .. } => Role::Admin,
            Identity::Dealer { .. } => Role::Dealer,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Identity::Admin { username } | Identity::Dealer { username, .. } => username,
        }
    }

    /// Subject id as it appears in claims and audit entries.
    pub fn subject(&self) -> String {
        match self {
            Identity::Admin { .. } => ADMIN_SUBJECT.to_string(),
            Identity::Dealer { dealer_id, .. } => dealer_id.to_string(),
        }
    }

    pub fn dealer_id(&self) -> Option<DealerId> {
        match self {
            Identity::Admin { .. } => None,
            Identity::Dealer { dealer_id, .. } => Some(*dealer_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin { .. })
    }
}

impl TryFrom<&SessionClaims> for Identity {
    type Error = TokenError;

    fn try_from(claims: &SessionClaims) -> Result<Self, Self::Error> {
        match claims.role {
            Role::Admin => Ok(Identity::Admin {
                username: claims.username.clone(),
            }),
            Role::Dealer => {
                let dealer_id = claims.sub.parse::<DealerId>().map_err(|_| TokenError::Invalid)?;
                Ok(Identity::Dealer {
                    dealer_id,
                    username: claims.username.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn dealer_claims_need_a_dealer_id_subject() {
        let now = Utc::now();
        let bad = SessionClaims::new("not-a-uuid", Role::Dealer, "d1", now, now + Duration::hours(1));
        assert_eq!(Identity::try_from(&bad), Err(TokenError::Invalid));

        let id = DealerId::new();
        let good = SessionClaims::new(id.to_string(), Role::Dealer, "d1", now, now + Duration::hours(1));
        let identity = Identity::try_from(&good).unwrap();
        assert_eq!(identity.dealer_id(), Some(id));
        assert_eq!(identity.subject(), id.to_string());
    }

    #[test]
    fn admin_claims_map_to_admin_identity() {
        let now = Utc::now();
        let claims = SessionClaims::new(ADMIN_SUBJECT, Role::Admin, "root", now, now + Duration::hours(1));
        let identity = Identity::try_from(&claims).unwrap();
        assert!(identity.is_admin());
        assert_eq!(identity.username(), "root");
        assert_eq!(identity.dealer_id(), None);
    }
}
