//! Role checks at the operation boundary.
//!
//! - No IO
//! - No panics

use dealerhub_core::{DealerId, DomainError};

use crate::{Identity, Role};

/// Require `identity` to hold `required`.
pub fn authorize(identity: &Identity, required: Role) -> Result<(), DomainError> {
    if identity.role() == required {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!("{required} access required")))
    }
}

/// Require a dealer session and return its tenant.
pub fn require_dealer(identity: &Identity) -> Result<DealerId, DomainError> {
    identity
        .dealer_id()
        .ok_or_else(|| DomainError::forbidden("dealer access required"))
}
