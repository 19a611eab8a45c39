use chrono::{DateTime, Utc};
use serde::Serialize;

use dealerhub_core::DealerId;
use dealerhub_core::normalize::{identity_key, phone_digits};
use dealerhub_parties::{Customer, CustomerType, Employee};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Employee,
    Customer,
}

/// Common searchable shape for heterogeneous records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub entity_type: EntityType,
    pub entity_ref_id: String,
    pub canonical_name: String,
    pub phone_norm: String,
    pub identity_norm: String,
    pub owner_dealer_id: DealerId,
    pub owner_dealer_name: String,
    pub status_summary: String,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
    pub termination_date: Option<DateTime<Utc>>,
    pub termination_reason: Option<String>,
}

impl SearchIndexEntry {
    pub fn from_employee(employee: &Employee, owner_dealer_name: &str) -> Self {
        Self {
            entity_type: EntityType::Employee,
            entity_ref_id: employee.id.to_string(),
            canonical_name: employee.full_name(),
            phone_norm: phone_digits(&employee.phone),
            identity_norm: identity_key(&employee.aadhar),
            owner_dealer_id: employee.dealer_id,
            owner_dealer_name: owner_dealer_name.to_string(),
            status_summary: employee.status.as_str().to_string(),
            email: employee.email.clone(),
            customer_type: None,
            termination_date: employee.termination_date,
            termination_reason: employee.termination_reason.clone(),
        }
    }

    pub fn from_customer(customer: &Customer, owner_dealer_name: &str) -> Self {
        Self {
            entity_type: EntityType::Customer,
            entity_ref_id: customer.id.to_string(),
            canonical_name: customer.name_or_entity.clone(),
            phone_norm: phone_digits(&customer.phone),
            identity_norm: identity_key(&customer.official_id),
            owner_dealer_id: customer.dealer_id,
            owner_dealer_name: owner_dealer_name.to_string(),
            status_summary: customer.status.as_str().to_string(),
            email: customer.email.clone(),
            customer_type: Some(customer.customer_type),
            termination_date: customer.termination_date,
            termination_reason: customer.termination_reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use dealerhub_core::{CustomerId, EmployeeId};
    use dealerhub_parties::{NewCustomer, NewEmployee};

    use super::*;

    #[test]
    fn employee_projection_normalizes_phone_and_aadhar() {
        let employee = Employee::create(
            EmployeeId::new(),
            DealerId::new(),
            NewEmployee {
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                phone: "+91 987-654-3210".into(),
                email: None,
                aadhar: "1234 5678 9012".into(),
                designation: None,
                joining_date: None,
            },
            Utc::now(),
        );
        let entry = SearchIndexEntry::from_employee(&employee, "Acme");
        assert_eq!(entry.canonical_name, "Asha Rao");
        assert_eq!(entry.phone_norm, "919876543210");
        assert_eq!(entry.identity_norm, "123456789012");
        assert_eq!(entry.status_summary, "active");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["entityType"], "employee");
        assert_eq!(json["ownerDealerName"], "Acme");
        assert!(json.get("customerType").is_none());
    }

    #[test]
    fn customer_projection_carries_type() {
        let customer = Customer::create(
            CustomerId::new(),
            DealerId::new(),
            NewCustomer {
                name_or_entity: "Bharat Motors".into(),
                customer_type: CustomerType::Business,
                phone: "022-555-0101".into(),
                email: Some("ops@bharat.in".into()),
                official_id: "gst/27 aa".into(),
                address: None,
            },
            Utc::now(),
        );
        let json = serde_json::to_value(SearchIndexEntry::from_customer(&customer, "Acme")).unwrap();
        assert_eq!(json["customerType"], "business");
        assert_eq!(json["identityNorm"], "GST27AA");
        assert_eq!(json["terminationDate"], serde_json::Value::Null);
    }
}
