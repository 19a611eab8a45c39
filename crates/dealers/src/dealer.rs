//! Dealer entity and the account status state machine.
//!
//! ```text
//! ACTIVE ──suspend(reason)──▶ SUSPENDED ──activate──▶ ACTIVE
//!   │                            │
//!   └──delete(reason)──▶ DELETED ◀──delete(reason)──┘
//! ```
//!
//! DELETED is terminal: every command against a deleted dealer fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealerhub_core::{Aggregate, DealerId, DomainError};

use crate::validate::{self, DealerProfileUpdate, NewDealer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealerStatus {
    Active,
    Suspended,
    Deleted,
}

impl DealerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealerStatus::Active => "ACTIVE",
            DealerStatus::Suspended => "SUSPENDED",
            DealerStatus::Deleted => "DELETED",
        }
    }
}

impl core::fmt::Display for DealerStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for DealerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(DealerStatus::Active),
            "SUSPENDED" => Ok(DealerStatus::Suspended),
            "DELETED" => Ok(DealerStatus::Deleted),
            other => Err(DomainError::validation(format!("unknown dealer status '{other}'"))),
        }
    }
}

/// A tenant account.
///
/// # Invariants
/// - `username` and `email` are unique (enforced by the store).
/// - Created ACTIVE by an admin; never physically removed.
/// - `suspension_reason` is set only while SUSPENDED.
/// - `deletion_reason`/`deletion_date` are set exactly when DELETED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dealer {
    pub id: DealerId,
    pub username: String,
    pub email: String,
    pub company_name: String,
    pub primary_contact_name: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    pub force_password_change: bool,
    pub status: DealerStatus,
    pub suspension_reason: Option<String>,
    pub deletion_reason: Option<String>,
    pub deletion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Dealer {
    /// Build a new ACTIVE dealer from a validated payload and a temporary
    /// password hash. The dealer must change the password on first login.
    pub fn create(id: DealerId, payload: NewDealer, temp_password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: payload.username,
            email: payload.email,
            company_name: payload.company_name,
            primary_contact_name: payload.primary_contact_name,
            primary_contact_phone: payload.primary_contact_phone,
            address: payload.address,
            password_hash: temp_password_hash,
            force_password_change: true,
            status: DealerStatus::Active,
            suspension_reason: None,
            deletion_reason: None,
            deletion_date: None,
            created_at: now,
        }
    }

    /// Login gate. Only ACTIVE dealers may authenticate or act.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status == DealerStatus::Active {
            Ok(())
        } else {
            Err(DomainError::AccountNotActive(self.status.to_string()))
        }
    }

    fn ensure_not_deleted(&self) -> Result<(), DomainError> {
        if self.status == DealerStatus::Deleted {
            return Err(DomainError::transition("dealer already deleted"));
        }
        Ok(())
    }

    /// `"<contact> (<username> at <company>)"`, used as the audit actor name.
    /// Without a contact name the username stands in.
    pub fn display_name(&self) -> String {
        format!(
            "{} ({} at {})",
            self.contact_name(),
            self.username,
            self.company_name
        )
    }

    /// Name to address the dealer by.
    pub fn contact_name(&self) -> &str {
        self.primary_contact_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealerCommand {
    UpdateProfile(DealerProfileUpdate),
    Suspend { reason: String },
    Activate,
    Delete { reason: String, at: DateTime<Utc> },
    /// Store a new password hash. `temporary` forces a change on next login.
    SetPassword { password_hash: String, temporary: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealerEvent {
    ProfileUpdated(DealerProfileUpdate),
    Suspended { reason: String },
    Activated,
    Deleted { reason: String, at: DateTime<Utc> },
    PasswordSet { password_hash: String, temporary: bool },
}

impl Aggregate for Dealer {
    type Command = DealerCommand;
    type Event = DealerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DealerEvent::ProfileUpdated(update) => {
                if let Some(email) = &update.email {
                    self.email = email.clone();
                }
                if let Some(name) = &update.company_name {
                    self.company_name = name.clone();
                }
                if let Some(name) = &update.primary_contact_name {
                    self.primary_contact_name = Some(name.clone());
                }
                if let Some(phone) = &update.primary_contact_phone {
                    self.primary_contact_phone = Some(phone.clone());
                }
                if let Some(address) = &update.address {
                    self.address = Some(address.clone());
                }
            }
            DealerEvent::Suspended { reason } => {
                self.status = DealerStatus::Suspended;
                self.suspension_reason = Some(reason.clone());
            }
            DealerEvent::Activated => {
                self.status = DealerStatus::Active;
                self.suspension_reason = None;
            }
            DealerEvent::Deleted { reason, at } => {
                self.status = DealerStatus::Deleted;
                self.deletion_reason = Some(reason.clone());
                self.deletion_date = Some(*at);
            }
            DealerEvent::PasswordSet {
                password_hash,
                temporary,
            } => {
                self.password_hash = password_hash.clone();
                self.force_password_change = *temporary;
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_not_deleted()?;

        match command {
            DealerCommand::UpdateProfile(update) => {
                let update = update.clone().validated()?;
                if update.is_empty() {
                    return Err(DomainError::validation("no fields to update"));
                }
                Ok(vec![DealerEvent::ProfileUpdated(update)])
            }
            // Re-suspending replaces the reason; activating an ACTIVE dealer is a no-op.
            DealerCommand::Suspend { reason } => Ok(vec![DealerEvent::Suspended {
                reason: validate::reason(reason)?,
            }]),
            DealerCommand::Activate => Ok(vec![DealerEvent::Activated]),
            DealerCommand::Delete { reason, at } => Ok(vec![DealerEvent::Deleted {
                reason: validate::reason(reason)?,
                at: *at,
            }]),
            DealerCommand::SetPassword {
                password_hash,
                temporary,
            } => Ok(vec![DealerEvent::PasswordSet {
                password_hash: password_hash.clone(),
                temporary: *temporary,
            }]),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn new_dealer() -> Dealer {
        let payload = NewDealer {
            username: "d1".into(),
            email: "d1@x.com".into(),
            company_name: "Acme".into(),
            primary_contact_name: Some("Ravi".into()),
            primary_contact_phone: Some("9876543210".into()),
            address: Some("1 Main Rd".into()),
        }
        .validated()
        .unwrap();
        Dealer::create(DealerId::new(), payload, "hash".into(), Utc::now())
    }

    fn in_status(status: DealerStatus) -> Dealer {
        let mut dealer = new_dealer();
        match status {
            DealerStatus::Active => {}
            DealerStatus::Suspended => {
                dealer
                    .execute(&DealerCommand::Suspend {
                        reason: "non-payment".into(),
                    })
                    .unwrap();
            }
            DealerStatus::Deleted => {
                dealer
                    .execute(&DealerCommand::Delete {
                        reason: "closed".into(),
                        at: Utc::now(),
                    })
                    .unwrap();
            }
        }
        dealer
    }

    #[test]
    fn new_dealer_is_active_and_must_change_password() {
        let dealer = new_dealer();
        assert_eq!(dealer.status, DealerStatus::Active);
        assert!(dealer.force_password_change);
        assert!(dealer.ensure_active().is_ok());
    }

    #[test]
    fn suspend_then_activate_round_trips_reason() {
        let mut dealer = new_dealer();
        dealer
            .execute(&DealerCommand::Suspend {
                reason: "non-payment".into(),
            })
            .unwrap();
        assert_eq!(dealer.status, DealerStatus::Suspended);
        assert_eq!(dealer.suspension_reason.as_deref(), Some("non-payment"));
        assert_eq!(
            dealer.ensure_active(),
            Err(DomainError::AccountNotActive("SUSPENDED".into()))
        );

        dealer.execute(&DealerCommand::Activate).unwrap();
        assert_eq!(dealer.status, DealerStatus::Active);
        assert_eq!(dealer.suspension_reason, None);
    }

    #[test]
    fn delete_from_active_and_suspended_sets_date() {
        for start in [DealerStatus::Active, DealerStatus::Suspended] {
            let mut dealer = in_status(start);
            let at = Utc::now();
            dealer
                .execute(&DealerCommand::Delete {
                    reason: "fraud".into(),
                    at,
                })
                .unwrap();
            assert_eq!(dealer.status, DealerStatus::Deleted);
            assert_eq!(dealer.deletion_reason.as_deref(), Some("fraud"));
            assert_eq!(dealer.deletion_date, Some(at));
        }
    }

    #[test]
    fn transitions_require_reason() {
        let dealer = new_dealer();
        let err = dealer
            .handle(&DealerCommand::Suspend { reason: " ".into() })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn resuspending_replaces_the_reason() {
        let mut dealer = in_status(DealerStatus::Suspended);
        dealer
            .execute(&DealerCommand::Suspend {
                reason: "audit pending".into(),
            })
            .unwrap();
        assert_eq!(dealer.status, DealerStatus::Suspended);
        assert_eq!(dealer.suspension_reason.as_deref(), Some("audit pending"));
    }

    #[test]
    fn activating_an_active_dealer_is_accepted() {
        let mut dealer = in_status(DealerStatus::Active);
        let before = dealer.clone();
        assert_eq!(
            dealer.execute(&DealerCommand::Activate).unwrap(),
            vec![DealerEvent::Activated]
        );
        assert_eq!(dealer, before);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut dealer = new_dealer();
        assert_eq!(dealer.display_name(), "Ravi (d1 at Acme)");
        dealer.primary_contact_name = None;
        assert_eq!(dealer.display_name(), "d1 (d1 at Acme)");
    }

    #[test]
    fn password_set_toggles_force_flag() {
        let mut dealer = new_dealer();
        dealer
            .execute(&DealerCommand::SetPassword {
                password_hash: "h2".into(),
                temporary: false,
            })
            .unwrap();
        assert_eq!(dealer.password_hash, "h2");
        assert!(!dealer.force_password_change);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let dealer = new_dealer();
        let before = dealer.clone();
        let _ = dealer.handle(&DealerCommand::Suspend {
            reason: "late".into(),
        });
        assert_eq!(dealer, before);
    }

    fn any_command() -> impl Strategy<Value = DealerCommand> {
        prop_oneof![
            "[a-z ]{0,12}".prop_map(|reason| DealerCommand::Suspend { reason }),
            Just(DealerCommand::Activate),
            "[a-z ]{0,12}".prop_map(|reason| DealerCommand::Delete {
                reason,
                at: Utc::now()
            }),
            "[a-z]{0,8}".prop_map(|hash| DealerCommand::SetPassword {
                password_hash: hash,
                temporary: true
            }),
            "[a-z]{0,8}".prop_map(|name| DealerCommand::UpdateProfile(DealerProfileUpdate {
                company_name: Some(name),
                ..Default::default()
            })),
        ]
    }

    proptest! {
        #[test]
        fn deleted_dealers_reject_every_command(cmd in any_command()) {
            let dealer = in_status(DealerStatus::Deleted);
            let err = dealer.handle(&cmd).unwrap_err();
            prop_assert_eq!(err, DomainError::InvalidTransition("dealer already deleted".into()));
        }

        #[test]
        fn status_string_round_trips(idx in 0usize..3) {
            let status = [DealerStatus::Active, DealerStatus::Suspended, DealerStatus::Deleted][idx];
            prop_assert_eq!(status.as_str().parse::<DealerStatus>().unwrap(), status);
        }
    }
}
