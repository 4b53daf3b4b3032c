//! Lending domain errors
//!
//! This module defines all error types that can occur within the
//! lending domain.

use core_kernel::{Money, MoneyError};
use thiserror::Error;

/// Errors that can occur in the lending domain
#[derive(Debug, Error)]
pub enum LendingError {
    /// Input failed validation; names the offending field
    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    /// Payment is below the required amount and the caller did not confirm
    /// a partial payment
    #[error("Partial payment requires confirmation: required {required}, offered {offered}")]
    PartialPaymentRequiresConfirmation { required: Money, offered: Money },

    /// The loan is fully paid; no further payments are accepted
    #[error("Loan is already fully paid")]
    LoanAlreadyPaid,

    /// Payment not found on this loan
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Operation not permitted in the loan's current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Monetary arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl LendingError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LendingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        LendingError::InvalidOperation(message.into())
    }
}
