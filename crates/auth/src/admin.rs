//! The single admin credential.
//!
//! The admin has no dealer row; its secret comes from configuration, either as
//! a bcrypt hash or as plaintext compared in constant time.

use crate::password::verify_password;

/// Subject id placed in admin session claims.
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Clone)]
pub enum AdminCredential {
    Hashed(String),
    Plain(String),
}

impl core::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AdminCredential::Hashed(_) => f.write_str("AdminCredential::Hashed(..)"),
            AdminCredential::Plain(_) => f.write_str("AdminCredential::Plain(..)"),
        }
    }
}

impl AdminCredential {
    pub fn verify(&self, password: &str) -> bool {
        match self {
            AdminCredential::Hashed(hash) => verify_password(password, hash),
            AdminCredential::Plain(secret) => constant_time_eq(password.as_bytes(), secret.as_bytes()),
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, AdminCredential::Hashed(_))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;

    #[test]
    fn plain_secret_matches_exactly() {
        let cred = AdminCredential::Plain("Union@2025".to_string());
        assert!(cred.verify("Union@2025"));
        assert!(!cred.verify("Union@2024"));
        assert!(!cred.verify("Union@20255"));
        assert!(!cred.verify(""));
    }

    #[test]
    fn hashed_secret_uses_bcrypt() {
        let cred = AdminCredential::Hashed(hash_password("hunter22", 4).unwrap());
        assert!(cred.is_hashed());
        assert!(cred.verify("hunter22"));
        assert!(!cred.verify("hunter23"));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let cred = AdminCredential::Plain("top-secret".to_string());
        assert!(!format!("{cred:?}").contains("top-secret"));
    }
}
