//! Canonical forms for fields that are compared rather than displayed.

/// Keep only ASCII digits: `"+91 987-654-3210"` -> `"919876543210"`.
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Drop non-word characters and uppercase: `"ab-12 cd"` -> `"AB12CD"`.
///
/// "Word" characters are ASCII letters, digits and underscore.
pub fn identity_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
