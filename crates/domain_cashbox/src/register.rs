//! Cash register with running balance and daily summaries
//!
//! # Invariants
//!
//! - The running balance is always the sum of all posted rows
//! - A day's closing balance equals the next day's opening balance
//! - Posted rows are never edited, only appended

use chrono::NaiveDate;
use core_kernel::Money;

use crate::entry::CashEntry;
use crate::error::CashboxError;

/// Daily close figures for the register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Balance carried in from previous days
    pub opening: Money,
    /// Money in during the day
    pub income: Money,
    /// Money out during the day
    pub expense: Money,
    /// Balance at end of day
    pub closing: Money,
}

/// The office cash register
///
/// An append-only list of rows plus the read models the caja screens
/// consume: running balance and the per-day summary.
#[derive(Debug, Default)]
pub struct CashRegister {
    entries: Vec<CashEntry>,
}

impl CashRegister {
    /// Creates an empty register
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a register from previously stored rows
    pub fn from_entries(mut entries: Vec<CashEntry>) -> Self {
        entries.sort_by_key(|e| (e.entry_date, e.recorded_at));
        Self { entries }
    }

    /// Returns all rows, oldest first
    pub fn entries(&self) -> &[CashEntry] {
        &self.entries
    }

    /// Appends a row to the register
    ///
    /// # Errors
    ///
    /// Rejects a row whose identifier is already posted.
    pub fn post(&mut self, entry: CashEntry) -> Result<(), CashboxError> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(CashboxError::validation("id", "entry is already posted"));
        }
        tracing::debug!(
            entry_id = %entry.id,
            date = %entry.entry_date,
            amount = %entry.amount,
            "cash entry posted"
        );
        self.entries.push(entry);
        self.entries.sort_by_key(|e| (e.entry_date, e.recorded_at));
        Ok(())
    }

    /// Current balance across all recorded days
    pub fn balance(&self) -> Money {
        self.entries.iter().map(|e| e.signed_amount()).sum()
    }

    /// Balance at end of the given day
    pub fn balance_as_of(&self, date: NaiveDate) -> Money {
        self.entries
            .iter()
            .filter(|e| e.entry_date <= date)
            .map(|e| e.signed_amount())
            .sum()
    }

    /// Rows recorded on the given day
    pub fn entries_for(&self, date: NaiveDate) -> Vec<&CashEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_date == date)
            .collect()
    }

    /// Builds the daily close summary for a day
    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        let opening: Money = self
            .entries
            .iter()
            .filter(|e| e.entry_date < date)
            .map(|e| e.signed_amount())
            .sum();

        let (income, expense) = self.entries_for(date).iter().fold(
            (Money::zero(), Money::zero()),
            |(income, expense), entry| match entry.direction {
                crate::entry::EntryDirection::Income => (income + entry.amount, expense),
                crate::entry::EntryDirection::Expense => (income, expense + entry.amount),
            },
        );

        DailySummary {
            date,
            opening,
            income,
            expense,
            closing: opening + income - expense,
        }
    }
}
