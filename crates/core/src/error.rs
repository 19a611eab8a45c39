//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// credentials, lifecycle rules, uniqueness). Storage and signing failures
/// belong to the infrastructure error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A payload failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Login failed. Never says whether the identifier or the password was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No usable session was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but the role does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The dealer account exists but is not allowed to sign in or act.
    #[error("account is not active: {0}")]
    AccountNotActive(String),

    /// A requested resource was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated (username, email, business identifier).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A lifecycle transition is not allowed from the current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}
