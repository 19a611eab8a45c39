//! Password hashing and temporary password generation.
//!
//! bcrypt is CPU-bound; async callers should run these on a blocking thread.

use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

/// Length of generated temporary passwords.
pub const TEMP_PASSWORD_LEN: usize = 12;

/// Minimum accepted length for a dealer-chosen password.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Compare a password with a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash could not be parsed");
            false
        }
    }
}

/// Random password from the ASCII alphanumeric alphabet.
pub fn generate_temporary_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
