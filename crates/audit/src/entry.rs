use chrono::{DateTime, Utc};
use serde::Serialize;

use dealerhub_core::{AuditEntryId, DealerId};

use crate::AuditAction;

/// The identity an audit entry is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    pub ip_address: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            ip_address: ip_address.into(),
        }
    }

    /// The admin under its fixed subject id, named `"Admin (<username>)"`.
    pub fn admin(subject: impl Into<String>, username: &str, ip_address: impl Into<String>) -> Self {
        Self::new(subject, format!("Admin ({username})"), ip_address)
    }
}

/// An entry as handed to the recorder, before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub actor: Actor,
    pub action: AuditAction,
    pub details: String,
    pub dealer_id: Option<DealerId>,
}

impl NewAuditEntry {
    pub fn new(actor: Actor, action: AuditAction, details: impl Into<String>) -> Self {
        Self {
            actor,
            action,
            details: details.into(),
            dealer_id: None,
        }
    }

    pub fn scoped_to(mut self, dealer_id: DealerId) -> Self {
        self.dealer_id = Some(dealer_id);
        self
    }

    pub fn seal(self, id: AuditEntryId, timestamp: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            who_user_id: self.actor.user_id,
            who_user_name: self.actor.user_name,
            dealer_id: self.dealer_id,
            action_type: self.action,
            details: self.details,
            ip_address: self.actor.ip_address,
            timestamp,
        }
    }
}

/// Immutable audit record. There is no API to change or remove one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub who_user_id: String,
    pub who_user_name: String,
    pub dealer_id: Option<DealerId>,
    pub action_type: AuditAction,
    pub details: String,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
}
