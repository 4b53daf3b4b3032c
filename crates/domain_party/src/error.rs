//! Party domain errors

use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Input failed validation; names the offending field
    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    /// Client not found
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Collector not found
    #[error("Collector not found: {0}")]
    CollectorNotFound(String),
}

impl PartyError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PartyError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
