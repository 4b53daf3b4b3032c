//! Registry validation rules
//!
//! Clients and collectors come in from hand-typed office forms, so the
//! rules stay deliberately loose: required names, plausible phone
//! numbers, non-empty document numbers. Anything stricter has historically
//! been worked around by the office staff.

use crate::error::PartyError;

/// Validates a person's display name
pub fn validate_full_name(field: &str, value: &str) -> Result<(), PartyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PartyError::validation(field, "name is required"));
    }
    if trimmed.len() > 120 {
        return Err(PartyError::validation(field, "name is too long"));
    }
    Ok(())
}

/// Validates an identity-document number
pub fn validate_document_id(value: &str) -> Result<(), PartyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PartyError::validation("document_id", "document number is required"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(PartyError::validation(
            "document_id",
            "document number may only contain letters, digits, and dashes",
        ));
    }
    Ok(())
}

/// Validates a phone number: digits with optional separators, 7-15 digits
pub fn validate_phone(value: &str) -> Result<(), PartyError> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+'));

    if !allowed || digits.len() < 7 || digits.len() > 15 {
        return Err(PartyError::validation("phone", "phone number is not valid"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_must_not_be_blank() {
        assert!(validate_full_name("full_name", "Maria Perez").is_ok());
        assert!(validate_full_name("full_name", "   ").is_err());
    }

    #[test]
    fn test_document_rejects_symbols() {
        assert!(validate_document_id("001-1234567-8").is_ok());
        assert!(validate_document_id("0011234@78").is_err());
        assert!(validate_document_id("").is_err());
    }

    #[test]
    fn test_phone_length_and_charset() {
        assert!(validate_phone("809-555-0134").is_ok());
        assert!(validate_phone("+1 (809) 555-0134").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("call-me").is_err());
    }
}
