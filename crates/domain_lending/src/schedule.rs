//! Collection schedule generation
//!
//! Due dates are derived, not stored as their own table: the schedule is
//! regenerated from the loan's terms whenever the anchor date changes.
//! Re-anchoring only moves unpaid periods; settled periods keep their
//! historical due dates.

use chrono::NaiveDate;
use core_kernel::{Frequency, Money};
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationTerms;

/// One expected collection in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-indexed period
    pub period: u32,
    /// Calendar day the installment falls due
    pub due_date: NaiveDate,
    /// Expected amount for this period
    pub amount: Money,
}

/// Generates the full schedule from the loan's start date
///
/// Period k falls k collection steps after the start date, so the first
/// installment is due one full period after disbursement.
pub fn generate_schedule(
    start_date: NaiveDate,
    frequency: Frequency,
    terms: &AmortizationTerms,
) -> Vec<ScheduleEntry> {
    (1..=terms.term)
        .map(|period| ScheduleEntry {
            period,
            due_date: frequency.advance(start_date, period),
            amount: terms.expected_amount(period),
        })
        .collect()
}

/// Re-anchors the unpaid tail of a schedule at a new date
///
/// Entries for the first `paid_periods` periods are preserved untouched;
/// the first unpaid period falls one collection step after `new_anchor`
/// and the rest follow at the usual spacing.
pub fn reanchor_schedule(
    current: &[ScheduleEntry],
    paid_periods: u32,
    new_anchor: NaiveDate,
    frequency: Frequency,
    terms: &AmortizationTerms,
) -> Vec<ScheduleEntry> {
    current
        .iter()
        .filter(|entry| entry.period <= paid_periods)
        .copied()
        .chain((paid_periods + 1..=terms.term).map(|period| ScheduleEntry {
            period,
            due_date: frequency.advance(new_anchor, period - paid_periods),
            amount: terms.expected_amount(period),
        }))
        .collect()
}
