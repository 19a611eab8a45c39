//! `dealerhub-auth`: credentials, session tokens and role checks.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod admin;
pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use admin::{ADMIN_SUBJECT, AdminCredential};
pub use authorize::{authorize, require_dealer};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use password::{MIN_PASSWORD_LEN, PasswordError, TEMP_PASSWORD_LEN, generate_temporary_password, hash_password, verify_password};
pub use principal::Identity;
pub use roles::Role;
pub use token::{SESSION_TTL_HOURS, TokenError, TokenService};
