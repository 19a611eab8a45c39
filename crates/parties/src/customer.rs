use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealerhub_core::normalize::identity_key;
use dealerhub_core::{Aggregate, CustomerId, DealerId, DomainError};

use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Individual,
    Business,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Individual => "individual",
            CustomerType::Business => "business",
        }
    }
}

impl core::str::FromStr for CustomerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(CustomerType::Individual),
            "business" => Ok(CustomerType::Business),
            other => Err(DomainError::validation(format!("unknown customer type '{other}'"))),
        }
    }
}

/// Customers are never deleted. Ending the relationship marks them inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

impl core::str::FromStr for CustomerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CustomerStatus::Active),
            "inactive" => Ok(CustomerStatus::Inactive),
            other => Err(DomainError::validation(format!("unknown customer status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub dealer_id: DealerId,
    pub name_or_entity: String,
    pub customer_type: CustomerType,
    pub phone: String,
    pub email: Option<String>,
    pub official_id: String,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub termination_reason: Option<String>,
    pub termination_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name_or_entity: String,
    #[serde(default = "default_customer_type")]
    pub customer_type: CustomerType,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub official_id: String,
    #[serde(default)]
    pub address: Option<String>,
}

fn default_customer_type() -> CustomerType {
    CustomerType::Individual
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name_or_entity: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub official_id: Option<String>,
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            name_or_entity: validate::required("nameOrEntity", &self.name_or_entity)?,
            customer_type: self.customer_type,
            phone: validate::phone(&self.phone)?,
            email: validate::optional(self.email),
            official_id: validate::identifier("officialId", &self.official_id)?,
            address: validate::optional(self.address),
        })
    }
}

impl CustomerUpdate {
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            name_or_entity: self
                .name_or_entity
                .as_deref()
                .map(|v| validate::required("nameOrEntity", v))
                .transpose()?,
            customer_type: self.customer_type,
            phone: self.phone.as_deref().map(validate::phone).transpose()?,
            email: validate::optional(self.email),
            official_id: self
                .official_id
                .as_deref()
                .map(|v| validate::identifier("officialId", v))
                .transpose()?,
            address: validate::optional(self.address),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name_or_entity.is_none()
            && self.customer_type.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.official_id.is_none()
            && self.address.is_none()
    }
}

impl Customer {
    pub fn create(id: CustomerId, dealer_id: DealerId, payload: NewCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            dealer_id,
            name_or_entity: payload.name_or_entity,
            customer_type: payload.customer_type,
            phone: payload.phone,
            email: payload.email,
            official_id: payload.official_id,
            address: payload.address,
            status: CustomerStatus::Active,
            termination_reason: None,
            termination_date: None,
            created_at: now,
        }
    }

    /// Cross-tenant uniqueness key.
    pub fn official_id_key(&self) -> String {
        identity_key(&self.official_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerCommand {
    Update(CustomerUpdate),
    Terminate { reason: String, date: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerEvent {
    Updated(CustomerUpdate),
    Terminated { reason: String, date: DateTime<Utc> },
}

impl Aggregate for Customer {
    type Command = CustomerCommand;
    type Event = CustomerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CustomerEvent::Updated(u) => {
                if let Some(v) = &u.name_or_entity {
                    self.name_or_entity = v.clone();
                }
                if let Some(v) = u.customer_type {
                    self.customer_type = v;
                }
                if let Some(v) = &u.phone {
                    self.phone = v.clone();
                }
                if u.email.is_some() {
                    self.email = u.email.clone();
                }
                if let Some(v) = &u.official_id {
                    self.official_id = v.clone();
                }
                if u.address.is_some() {
                    self.address = u.address.clone();
                }
            }
            CustomerEvent::Terminated { reason, date } => {
                self.status = CustomerStatus::Inactive;
                self.termination_reason = Some(reason.clone());
                self.termination_date = Some(*date);
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CustomerCommand::Update(update) => {
                let update = update.clone().validated()?;
                if update.is_empty() {
                    return Err(DomainError::validation("no fields to update"));
                }
                Ok(vec![CustomerEvent::Updated(update)])
            }
            CustomerCommand::Terminate { reason, date } => {
                if self.status == CustomerStatus::Inactive {
                    return Err(DomainError::transition("customer already inactive"));
                }
                Ok(vec![CustomerEvent::Terminated {
                    reason: validate::reason(reason)?,
                    date: *date,
                }])
            }
        }
    }
}
