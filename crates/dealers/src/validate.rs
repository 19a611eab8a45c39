//! Payload validation for dealer creation and profile edits.

use serde::Deserialize;

use dealerhub_core::DomainError;

/// Admin-supplied fields for a new dealer. Contact details may be filled in later.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDealer {
    pub username: String,
    pub email: String,
    pub company_name: String,
    #[serde(default)]
    pub primary_contact_name: Option<String>,
    #[serde(default)]
    pub primary_contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Partial profile edit. `username` is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerProfileUpdate {
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub address: Option<String>,
}

impl NewDealer {
    /// Trim, lowercase identifiers and check field lengths.
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            username: min_len("username", &self.username, 2)?.to_lowercase(),
            email: email(&self.email)?,
            company_name: min_len("companyName", &self.company_name, 2)?,
            primary_contact_name: optional("primaryContactName", blank_to_none(self.primary_contact_name), 2)?,
            primary_contact_phone: optional("primaryContactPhone", blank_to_none(self.primary_contact_phone), 6)?,
            address: optional("address", blank_to_none(self.address), 3)?,
        })
    }
}

impl DealerProfileUpdate {
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            email: self.email.as_deref().map(email).transpose()?,
            company_name: optional("companyName", self.company_name, 2)?,
            primary_contact_name: optional("primaryContactName", self.primary_contact_name, 2)?,
            primary_contact_phone: optional("primaryContactPhone", self.primary_contact_phone, 6)?,
            address: optional("address", self.address, 3)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.company_name.is_none()
            && self.primary_contact_name.is_none()
            && self.primary_contact_phone.is_none()
            && self.address.is_none()
    }
}

/// Reasons for suspension and deletion.
pub fn reason(value: &str) -> Result<String, DomainError> {
    min_len("reason", value, 2)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn optional(field: &str, value: Option<String>, min: usize) -> Result<Option<String>, DomainError> {
    value.as_deref().map(|v| min_len(field, v, min)).transpose()
}

fn min_len(field: &str, value: &str, min: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        return Err(DomainError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn email(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim().to_lowercase();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email is not a valid address"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> NewDealer {
        NewDealer {
            username: "  D1 ".into(),
            email: "D1@X.com".into(),
            company_name: "Acme".into(),
            primary_contact_name: Some("Ravi".into()),
            primary_contact_phone: Some("+91 98765".into()),
            address: Some("1 Main Rd".into()),
        }
    }

    #[test]
    fn normalizes_identifiers() {
        let d = acme().validated().unwrap();
        assert_eq!(d.username, "d1");
        assert_eq!(d.email, "d1@x.com");
    }

    #[test]
    fn rejects_short_fields_and_bad_email() {
        let mut d = acme();
        d.username = " a ".into();
        assert!(matches!(d.validated(), Err(DomainError::Validation(m)) if m.contains("username")));

        let mut d = acme();
        d.primary_contact_phone = Some("12".into());
        assert!(matches!(d.validated(), Err(DomainError::Validation(m)) if m.contains("primaryContactPhone")));

        for bad in ["", "no-at-sign", "a@b", "a@@b.com", "@x.com", "a b@x.com", "a@.com"] {
            let mut d = acme();
            d.email = bad.into();
            assert!(d.validated().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn minimal_payload_needs_only_identity_and_company() {
        let d: NewDealer = serde_json::from_value(serde_json::json!({
            "username": "d1",
            "email": "d1@x.com",
            "companyName": "Acme",
        }))
        .unwrap();
        let d = d.validated().unwrap();
        assert_eq!(d.username, "d1");
        assert_eq!(d.primary_contact_name, None);
        assert_eq!(d.address, None);
    }

    #[test]
    fn blank_contact_fields_are_treated_as_absent() {
        let mut d = acme();
        d.primary_contact_name = Some("   ".into());
        assert_eq!(d.validated().unwrap().primary_contact_name, None);
    }

    #[test]
    fn update_validates_only_present_fields() {
        let empty = DealerProfileUpdate::default();
        assert!(empty.is_empty());
        assert!(empty.validated().is_ok());

        let update = DealerProfileUpdate {
            company_name: Some(" A ".into()),
            ..Default::default()
        };
        assert!(update.validated().is_err());
    }

    #[test]
    fn reason_requires_two_visible_chars() {
        assert!(reason(" x ").is_err());
        assert_eq!(reason(" non-payment ").unwrap(), "non-payment");
    }
}
