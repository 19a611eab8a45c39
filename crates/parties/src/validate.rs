use dealerhub_core::DomainError;
use dealerhub_core::normalize::{identity_key, phone_digits};

pub(crate) fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn phone(value: &str) -> Result<String, DomainError> {
    let trimmed = required("phone", value)?;
    if phone_digits(&trimmed).len() < 6 {
        return Err(DomainError::validation("phone must contain at least 6 digits"));
    }
    Ok(trimmed)
}

pub(crate) fn identifier(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = required(field, value)?;
    if identity_key(&trimmed).is_empty() {
        return Err(DomainError::validation(format!(
            "{field} must contain letters or digits"
        )));
    }
    Ok(trimmed)
}

pub(crate) fn reason(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < 2 {
        return Err(DomainError::validation("reason must be at least 2 characters"));
    }
    Ok(trimmed.to_string())
}
