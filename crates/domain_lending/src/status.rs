//! Loan status state machine
//!
//! Status is a closed enum derived from the collection state, never an ad
//! hoc string. The wire names stay the Spanish ones the back office has
//! always used (ACTIVO / ATRASADO / PAGADO).

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LendingError;

/// Lifecycle states of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Collections on schedule
    #[serde(rename = "ACTIVO")]
    Active,
    /// At least one installment overdue, or mora outstanding
    #[serde(rename = "ATRASADO")]
    Overdue,
    /// All periods settled; terminal, no further payments accepted
    #[serde(rename = "PAGADO")]
    Paid,
}

impl LoanStatus {
    /// Returns the wire name used by the API and database
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVO",
            LoanStatus::Overdue => "ATRASADO",
            LoanStatus::Paid => "PAGADO",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVO" => Ok(LoanStatus::Active),
            "ATRASADO" => Ok(LoanStatus::Overdue),
            "PAGADO" => Ok(LoanStatus::Paid),
            other => Err(LendingError::validation(
                "status",
                format!("unknown loan status: {}", other),
            )),
        }
    }
}

/// Derives the status from the collection state
///
/// Pure function of its inputs: deriving twice from the same state gives
/// the same answer, so callers can recompute freely after every mutation.
pub fn derive_status(
    paid_periods: u32,
    term: u32,
    accrued_mora: Money,
    today: NaiveDate,
    next_unpaid_due: Option<NaiveDate>,
) -> LoanStatus {
    if paid_periods >= term && accrued_mora.is_zero() {
        return LoanStatus::Paid;
    }
    if accrued_mora.is_positive() {
        return LoanStatus::Overdue;
    }
    match next_unpaid_due {
        Some(due) if today > due => LoanStatus::Overdue,
        _ => LoanStatus::Active,
    }
}

/// An operator-forced status, recorded as an audited decision
///
/// While an override is present, automatic derivation does not replace
/// the status on reads; the next engine mutation clears the override and
/// re-derives, emitting an explicit status event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub status: LoanStatus,
    /// Operator who forced the state
    pub actor: String,
    pub reason: Option<String>,
    pub overridden_at: DateTime<Utc>,
}
