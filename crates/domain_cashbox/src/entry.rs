//! Cash register entries
//!
//! The register is a flat, single-entry ledger: every row is money in or
//! money out on a business day, optionally tied to a loan or a collector.
//! There is no chart of accounts and no double-entry balancing here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CashEntryId, CollectorId, LoanId, Money};

use crate::error::CashboxError;

/// Direction of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    /// Money into the register (collections, capital)
    Income,
    /// Money out of the register (disbursements, expenses)
    Expense,
}

/// A single row in the cash register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashEntry {
    /// Unique identifier
    pub id: CashEntryId,
    /// Business day the movement belongs to
    pub entry_date: NaiveDate,
    /// Direction of the movement
    pub direction: EntryDirection,
    /// Free-form concept line, as written in the paper book
    pub concept: String,
    /// Amount moved; always positive, the direction carries the sign
    pub amount: Money,
    /// Loan this movement relates to, if any
    pub loan_id: Option<LoanId>,
    /// Collector who handled the cash, if any
    pub collector_id: Option<CollectorId>,
    /// When the row was recorded
    pub recorded_at: DateTime<Utc>,
}

impl CashEntry {
    /// Creates a new register row
    ///
    /// # Errors
    ///
    /// Returns a validation error when the amount is not positive or the
    /// concept is blank.
    pub fn new(
        entry_date: NaiveDate,
        direction: EntryDirection,
        concept: impl Into<String>,
        amount: Money,
    ) -> Result<Self, CashboxError> {
        let concept = concept.into();
        if concept.trim().is_empty() {
            return Err(CashboxError::validation("concept", "concept is required"));
        }
        if !amount.is_positive() {
            return Err(CashboxError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }

        Ok(Self {
            id: CashEntryId::new_v7(),
            entry_date,
            direction,
            concept: concept.trim().to_string(),
            amount,
            loan_id: None,
            collector_id: None,
            recorded_at: Utc::now(),
        })
    }

    /// Ties the row to a loan
    pub fn with_loan(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    /// Ties the row to a collector
    pub fn with_collector(mut self, collector_id: CollectorId) -> Self {
        self.collector_id = Some(collector_id);
        self
    }

    /// The signed effect of this row on the register balance
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            EntryDirection::Income => self.amount,
            EntryDirection::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_requires_positive_amount() {
        let err = CashEntry::new(
            date(2024, 1, 5),
            EntryDirection::Income,
            "cobro ruta 1",
            Money::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, CashboxError::Validation { field, .. } if field == "amount"));
    }

    #[test]
    fn test_entry_requires_concept() {
        let err = CashEntry::new(
            date(2024, 1, 5),
            EntryDirection::Income,
            "   ",
            Money::new(dec!(100)),
        )
        .unwrap_err();
        assert!(matches!(err, CashboxError::Validation { field, .. } if field == "concept"));
    }

    #[test]
    fn test_signed_amount_follows_direction() {
        let income = CashEntry::new(
            date(2024, 1, 5),
            EntryDirection::Income,
            "cobro",
            Money::new(dec!(100)),
        )
        .unwrap();
        let expense = CashEntry::new(
            date(2024, 1, 5),
            EntryDirection::Expense,
            "desembolso",
            Money::new(dec!(40)),
        )
        .unwrap();

        assert_eq!(income.signed_amount().amount(), dec!(100));
        assert_eq!(expense.signed_amount().amount(), dec!(-40));
    }
}
