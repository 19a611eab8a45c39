use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use dealerhub_core::normalize::identity_key;
use dealerhub_core::{Aggregate, DealerId, DomainError, EmployeeId};

use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

impl core::str::FromStr for EmployeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EmployeeStatus::Active),
            "terminated" => Ok(EmployeeStatus::Terminated),
            other => Err(DomainError::validation(format!("unknown employee status '{other}'"))),
        }
    }
}

/// An employee of one dealer.
///
/// Once terminated, `termination_reason` and `termination_date` never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub dealer_id: DealerId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhar: String,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub termination_reason: Option<String>,
    pub termination_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub aadhar: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub aadhar: Option<String>,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

impl NewEmployee {
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            first_name: validate::required("firstName", &self.first_name)?,
            last_name: validate::required("lastName", &self.last_name)?,
            phone: validate::phone(&self.phone)?,
            email: validate::optional(self.email),
            aadhar: validate::identifier("aadhar", &self.aadhar)?,
            designation: validate::optional(self.designation),
            joining_date: self.joining_date,
        })
    }
}

impl EmployeeUpdate {
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            first_name: self.first_name.as_deref().map(|v| validate::required("firstName", v)).transpose()?,
            last_name: self.last_name.as_deref().map(|v| validate::required("lastName", v)).transpose()?,
            phone: self.phone.as_deref().map(validate::phone).transpose()?,
            email: validate::optional(self.email),
            aadhar: self.aadhar.as_deref().map(|v| validate::identifier("aadhar", v)).transpose()?,
            designation: validate::optional(self.designation),
            joining_date: self.joining_date,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.aadhar.is_none()
            && self.designation.is_none()
            && self.joining_date.is_none()
    }
}

impl Employee {
    pub fn create(id: EmployeeId, dealer_id: DealerId, payload: NewEmployee, now: DateTime<Utc>) -> Self {
        Self {
            id,
            dealer_id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            email: payload.email,
            aadhar: payload.aadhar,
            designation: payload.designation,
            joining_date: payload.joining_date,
            status: EmployeeStatus::Active,
            termination_reason: None,
            termination_date: None,
            created_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Cross-tenant uniqueness key.
    pub fn aadhar_key(&self) -> String {
        identity_key(&self.aadhar)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeCommand {
    Update(EmployeeUpdate),
    Terminate { reason: String, date: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeEvent {
    Updated(EmployeeUpdate),
    Terminated { reason: String, date: DateTime<Utc> },
}

impl Aggregate for Employee {
    type Command = EmployeeCommand;
    type Event = EmployeeEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            EmployeeEvent::Updated(u) => {
                if let Some(v) = &u.first_name {
                    self.first_name = v.clone();
                }
                if let Some(v) = &u.last_name {
                    self.last_name = v.clone();
                }
                if let Some(v) = &u.phone {
                    self.phone = v.clone();
                }
                if u.email.is_some() {
                    self.email = u.email.clone();
                }
                if let Some(v) = &u.aadhar {
                    self.aadhar = v.clone();
                }
                if u.designation.is_some() {
                    self.designation = u.designation.clone();
                }
                if u.joining_date.is_some() {
                    self.joining_date = u.joining_date;
                }
            }
            EmployeeEvent::Terminated { reason, date } => {
                self.status = EmployeeStatus::Terminated;
                self.termination_reason = Some(reason.clone());
                self.termination_date = Some(*date);
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            EmployeeCommand::Update(update) => {
                let update = update.clone().validated()?;
                if update.is_empty() {
                    return Err(DomainError::validation("no fields to update"));
                }
                Ok(vec![EmployeeEvent::Updated(update)])
            }
            EmployeeCommand::Terminate { reason, date } => {
                if self.status == EmployeeStatus::Terminated {
                    return Err(DomainError::transition("employee already terminated"));
                }
                Ok(vec![EmployeeEvent::Terminated {
                    reason: validate::reason(reason)?,
                    date: *date,
                }])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewEmployee {
        NewEmployee {
            first_name: " Asha ".into(),
            last_name: "Rao".into(),
            phone: "+91 987-654-3210".into(),
            email: Some("  ".into()),
            aadhar: "1234 5678 9012".into(),
            designation: None,
            joining_date: None,
        }
    }

    fn employee() -> Employee {
        Employee::create(EmployeeId::new(), DealerId::new(), payload().validated().unwrap(), Utc::now())
    }

    #[test]
    fn create_trims_and_drops_blank_optionals() {
        let e = employee();
        assert_eq!(e.first_name, "Asha");
        assert_eq!(e.email, None);
        assert_eq!(e.status, EmployeeStatus::Active);
        assert_eq!(e.aadhar_key(), "123456789012");
        assert_eq!(e.full_name(), "Asha Rao");
    }

    #[test]
    fn rejects_short_phone_and_symbol_only_aadhar() {
        let mut p = payload();
        p.phone = "12-34".into();
        assert!(p.validated().is_err());

        let mut p = payload();
        p.aadhar = "--".into();
        assert!(p.validated().is_err());
    }

    #[test]
    fn termination_is_final() {
        let mut e = employee();
        let date = Utc::now();
        e.execute(&EmployeeCommand::Terminate {
            reason: "resigned".into(),
            date,
        })
        .unwrap();
        assert_eq!(e.status, EmployeeStatus::Terminated);
        assert_eq!(e.termination_reason.as_deref(), Some("resigned"));

        let err = e
            .handle(&EmployeeCommand::Terminate {
                reason: "again".into(),
                date: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(e.termination_date, Some(date));
    }

    #[test]
    fn update_after_termination_keeps_termination_fields() {
        let mut e = employee();
        e.execute(&EmployeeCommand::Terminate {
            reason: "resigned".into(),
            date: Utc::now(),
        })
        .unwrap();
        let before = (e.termination_reason.clone(), e.termination_date);
        e.execute(&EmployeeCommand::Update(EmployeeUpdate {
            phone: Some("011 2345 6789".into()),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!((e.termination_reason.clone(), e.termination_date), before);
        assert_eq!(e.phone, "011 2345 6789");
    }
}
