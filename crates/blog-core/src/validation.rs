//! Input checks shared by the resource services.

use uuid::Uuid;

use crate::error::DomainError;

/// Parse an entity identifier, reporting a malformed value as such.
pub fn parse_id(entity_type: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::Malformed {
        entity_type,
        value: raw.to_string(),
    })
}

/// A required text field: present and not blank. Returns the trimmed value.
pub fn require_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(text) => non_blank(field, text),
        None => Err(DomainError::Validation(format!("`{field}` is required"))),
    }
}

/// An optional text field in a patch: absent is fine, blank is not.
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    value.map(|text| non_blank(field, text)).transpose()
}

fn non_blank(field: &str, text: String) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("`{field}` must not be empty")));
    }
    Ok(trimmed.to_string())
}
