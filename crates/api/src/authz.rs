//! API-side authorization guards.
//!
//! Role checks delegate to `dealerhub_auth`; tenant scoping lives here
//! because it depends on which records a route touches.

use dealerhub_auth::{Identity, Role, authorize};
use dealerhub_core::{DealerId, DomainError};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

pub fn require_role(principal: &PrincipalContext, role: Role) -> Result<(), ApiError> {
    authorize(principal.identity(), role)?;
    Ok(())
}

/// Which dealer's records a list request may see.
///
/// Dealers always see their own; the admin sees everything unless it asks
/// for one dealer.
pub fn owner_filter(principal: &PrincipalContext, requested: Option<DealerId>) -> Option<DealerId> {
    match principal.identity() {
        Identity::Dealer { dealer_id, .. } => Some(*dealer_id),
        Identity::Admin { .. } => requested,
    }
}

/// Owner for a new record. The admin must name one; a dealer's own id always wins.
pub fn owner_for_create(principal: &PrincipalContext, requested: Option<DealerId>) -> Result<DealerId, ApiError> {
    match principal.identity() {
        Identity::Dealer { dealer_id, .. } => Ok(*dealer_id),
        Identity::Admin { .. } => requested.ok_or_else(|| ApiError::validation("dealerId is required")),
    }
}

/// Another tenant's record answers exactly like a missing one.
pub fn ensure_owner(principal: &PrincipalContext, owner: DealerId, what: &'static str) -> Result<(), ApiError> {
    match principal.identity() {
        Identity::Dealer { dealer_id, .. } if *dealer_id != owner => {
            Err(ApiError::Domain(DomainError::not_found(what)))
        }
        _ => Ok(()),
    }
}
