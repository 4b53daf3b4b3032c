//! Cash register errors

use thiserror::Error;

/// Errors that can occur in the cash register
#[derive(Debug, Error)]
pub enum CashboxError {
    /// Input failed validation; names the offending field
    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    /// Entry not found
    #[error("Cash entry not found: {0}")]
    EntryNotFound(String),
}

impl CashboxError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CashboxError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
