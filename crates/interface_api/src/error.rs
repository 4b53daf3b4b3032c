//! API error handling
//!
//! Maps the domain error taxonomy onto HTTP:
//! validation → 422, missing entities → 404, business-rule conflicts
//! (partial confirmation, already paid, concurrent modification) → 409
//! with a machine-readable code so the client can react.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_cashbox::CashboxError;
use domain_lending::LendingError;
use domain_party::PartyError;
use infra_db::DatabaseError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict with a machine-readable code the client dispatches on
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
            ApiError::Conflict { code, message } => {
                (StatusCode::CONFLICT, *code, message.clone())
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        match &err {
            LendingError::Validation { .. } => ApiError::Validation(err.to_string()),
            LendingError::PartialPaymentRequiresConfirmation { .. } => ApiError::Conflict {
                code: "partial_payment_requires_confirmation",
                message: err.to_string(),
            },
            LendingError::LoanAlreadyPaid => ApiError::Conflict {
                code: "loan_already_paid",
                message: err.to_string(),
            },
            LendingError::PaymentNotFound(_) => ApiError::NotFound(err.to_string()),
            LendingError::InvalidOperation(_) => ApiError::Conflict {
                code: "invalid_operation",
                message: err.to_string(),
            },
            LendingError::Money(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PartyError> for ApiError {
    fn from(err: PartyError) -> Self {
        match &err {
            PartyError::Validation { .. } => ApiError::Validation(err.to_string()),
            PartyError::ClientNotFound(_) | PartyError::CollectorNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
        }
    }
}

impl From<CashboxError> for ApiError {
    fn from(err: CashboxError) -> Self {
        match &err {
            CashboxError::Validation { .. } => ApiError::Validation(err.to_string()),
            CashboxError::EntryNotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DatabaseError::DuplicateEntry(_) => ApiError::Conflict {
                code: "duplicate_entry",
                message: err.to_string(),
            },
            DatabaseError::ConcurrentModification { .. } => ApiError::Conflict {
                code: "concurrent_modification",
                message: "the record changed while processing; retry the operation".to_string(),
            },
            DatabaseError::ConstraintViolation(_) => ApiError::Conflict {
                code: "constraint_violation",
                message: err.to_string(),
            },
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_confirmation_maps_to_conflict_code() {
        let err: ApiError = LendingError::PartialPaymentRequiresConfirmation {
            required: Money::new(dec!(100)),
            offered: Money::new(dec!(60)),
        }
        .into();

        assert!(matches!(
            err,
            ApiError::Conflict { code: "partial_payment_requires_confirmation", .. }
        ));
    }

    #[test]
    fn test_concurrent_modification_is_retryable_conflict() {
        let err: ApiError = DatabaseError::concurrent("Loan", "LON-1").into();
        assert!(matches!(
            err,
            ApiError::Conflict { code: "concurrent_modification", .. }
        ));
    }
}
