//! Credential Store: dealer password hashes, temporary passwords and the
//! admin secret.
//!
//! bcrypt work runs on the blocking pool so request tasks never stall.

use std::sync::Arc;

use thiserror::Error;

use dealerhub_auth::{
    AdminCredential, MIN_PASSWORD_LEN, PasswordError, generate_temporary_password, hash_password, verify_password,
};
use dealerhub_core::{Aggregate, DealerId, DomainError};
use dealerhub_dealers::{Dealer, DealerCommand};

use crate::store::{DealerStore, StoreError};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] PasswordError),

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

/// A freshly generated temporary password and its hash.
pub struct TemporaryCredential {
    pub plaintext: String,
    pub hash: String,
}

impl core::fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TemporaryCredential(..)")
    }
}

pub struct CredentialStore {
    dealers: Arc<dyn DealerStore>,
    admin: AdminCredential,
    admin_username: String,
    bcrypt_cost: u32,
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("admin", &self.admin)
            .field("admin_username", &self.admin_username)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

async fn blocking<T, F>(f: F) -> Result<T, CredentialError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CredentialError::Blocking(e.to_string()))
}

impl CredentialStore {
    pub fn new(
        dealers: Arc<dyn DealerStore>,
        admin: AdminCredential,
        admin_username: impl Into<String>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            dealers,
            admin,
            admin_username: admin_username.into(),
            bcrypt_cost,
        }
    }

    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    /// Check the admin secret. Fails with `InvalidCredentials` only.
    pub async fn verify_admin(&self, password: &str) -> Result<(), CredentialError> {
        let admin = self.admin.clone();
        let password = password.to_string();
        if blocking(move || admin.verify(&password)).await? {
            Ok(())
        } else {
            Err(DomainError::InvalidCredentials.into())
        }
    }

    /// Authenticate a dealer by username or email.
    ///
    /// Unknown identifier and wrong password both yield `InvalidCredentials`.
    /// Only a correct password on a non-ACTIVE dealer yields
    /// `AccountNotActive`, so status never leaks without the password.
    pub async fn verify(&self, identifier: &str, password: &str) -> Result<Dealer, CredentialError> {
        let identifier = identifier.trim().to_lowercase();
        let Some(dealer) = self.dealers.find_dealer_by_login(&identifier).await? else {
            return Err(DomainError::InvalidCredentials.into());
        };

        let hash = dealer.password_hash.clone();
        let password = password.to_string();
        if !blocking(move || verify_password(&password, &hash)).await? {
            return Err(DomainError::InvalidCredentials.into());
        }

        dealer.ensure_active()?;
        Ok(dealer)
    }

    /// Generate and hash a temporary password without storing it.
    pub async fn temporary_credential(&self) -> Result<TemporaryCredential, CredentialError> {
        let plaintext = generate_temporary_password();
        let to_hash = plaintext.clone();
        let cost = self.bcrypt_cost;
        let hash = blocking(move || hash_password(&to_hash, cost)).await??;
        Ok(TemporaryCredential { plaintext, hash })
    }

    /// Replace the dealer's password with a fresh temporary one and force a
    /// change on next login. Returns the updated dealer and the plaintext.
    pub async fn issue_temporary_password(&self, dealer_id: DealerId) -> Result<(Dealer, String), CredentialError> {
        let mut dealer = self.load(dealer_id).await?;
        let temp = self.temporary_credential().await?;
        dealer.execute(&DealerCommand::SetPassword {
            password_hash: temp.hash,
            temporary: true,
        })?;
        self.dealers.update_dealer(&dealer).await?;
        Ok((dealer, temp.plaintext))
    }

    /// Store a dealer-chosen password and clear the force-change flag.
    pub async fn set_password(&self, dealer_id: DealerId, new_password: &str) -> Result<Dealer, CredentialError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "newPassword must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }
        let mut dealer = self.load(dealer_id).await?;
        let password = new_password.to_string();
        let cost = self.bcrypt_cost;
        let hash = blocking(move || hash_password(&password, cost)).await??;
        dealer.execute(&DealerCommand::SetPassword {
            password_hash: hash,
            temporary: false,
        })?;
        self.dealers.update_dealer(&dealer).await?;
        Ok(dealer)
    }

    async fn load(&self, dealer_id: DealerId) -> Result<Dealer, CredentialError> {
        self.dealers
            .get_dealer(dealer_id)
            .await?
            .ok_or(CredentialError::Domain(DomainError::not_found("dealer")))
    }
}
