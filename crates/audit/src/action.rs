use serde::{Deserialize, Serialize};

use dealerhub_core::DomainError;

/// Every action that produces an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    CreateDealer,
    UpdateDealer,
    SuspendDealer,
    ActivateDealer,
    DeleteDealer,
    ResetPassword,
    ChangePassword,
    CreateEmployee,
    UpdateEmployee,
    TerminateEmployee,
    CreateCustomer,
    UpdateCustomer,
    TerminateCustomer,
    Search,
}

impl AuditAction {
    pub const ALL: [AuditAction; 15] = [
        AuditAction::Login,
        AuditAction::CreateDealer,
        AuditAction::UpdateDealer,
        AuditAction::SuspendDealer,
        AuditAction::ActivateDealer,
        AuditAction::DeleteDealer,
        AuditAction::ResetPassword,
        AuditAction::ChangePassword,
        AuditAction::CreateEmployee,
        AuditAction::UpdateEmployee,
        AuditAction::TerminateEmployee,
        AuditAction::CreateCustomer,
        AuditAction::UpdateCustomer,
        AuditAction::TerminateCustomer,
        AuditAction::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::CreateDealer => "CREATE_DEALER",
            AuditAction::UpdateDealer => "UPDATE_DEALER",
            AuditAction::SuspendDealer => "SUSPEND_DEALER",
            AuditAction::ActivateDealer => "ACTIVATE_DEALER",
            AuditAction::DeleteDealer => "DELETE_DEALER",
            AuditAction::ResetPassword => "RESET_PASSWORD",
            AuditAction::ChangePassword => "CHANGE_PASSWORD",
            AuditAction::CreateEmployee => "CREATE_EMPLOYEE",
            AuditAction::UpdateEmployee => "UPDATE_EMPLOYEE",
            AuditAction::TerminateEmployee => "TERMINATE_EMPLOYEE",
            AuditAction::CreateCustomer => "CREATE_CUSTOMER",
            AuditAction::UpdateCustomer => "UPDATE_CUSTOMER",
            AuditAction::TerminateCustomer => "TERMINATE_CUSTOMER",
            AuditAction::Search => "SEARCH",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown audit action '{s}'")))
    }
}
