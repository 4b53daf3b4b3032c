//! Domain events for the loan aggregate
//!
//! Domain events record every significant state change for the audit
//! trail and for downstream consumers (cash register postings, reports).

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{LoanId, Money, PaymentId};
use serde::{Deserialize, Serialize};

use crate::status::LoanStatus;

/// Events emitted by the Loan aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoanEvent {
    /// Loan created with fixed terms and an initial schedule
    LoanCreated {
        loan_id: LoanId,
        principal: Money,
        total_payable: Money,
        term: u32,
        timestamp: DateTime<Utc>,
    },

    /// A payment was applied
    PaymentRecorded {
        loan_id: LoanId,
        payment_id: PaymentId,
        period: u32,
        amount: Money,
        on_time: bool,
        settled_period: bool,
        timestamp: DateTime<Utc>,
    },

    /// A payment was reversed
    PaymentReversed {
        loan_id: LoanId,
        payment_id: PaymentId,
        period: u32,
        timestamp: DateTime<Utc>,
    },

    /// Unpaid due dates were re-anchored (change of payment day)
    ScheduleReanchored {
        loan_id: LoanId,
        new_anchor: NaiveDate,
        first_moved_period: u32,
        timestamp: DateTime<Utc>,
    },

    /// Status changed through automatic derivation
    StatusChanged {
        loan_id: LoanId,
        from: LoanStatus,
        to: LoanStatus,
        timestamp: DateTime<Utc>,
    },

    /// Status forced by an operator
    StatusOverridden {
        loan_id: LoanId,
        from: LoanStatus,
        to: LoanStatus,
        actor: String,
        reason: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl LoanEvent {
    /// Returns the loan ID associated with this event
    pub fn loan_id(&self) -> LoanId {
        match self {
            LoanEvent::LoanCreated { loan_id, .. } => *loan_id,
            LoanEvent::PaymentRecorded { loan_id, .. } => *loan_id,
            LoanEvent::PaymentReversed { loan_id, .. } => *loan_id,
            LoanEvent::ScheduleReanchored { loan_id, .. } => *loan_id,
            LoanEvent::StatusChanged { loan_id, .. } => *loan_id,
            LoanEvent::StatusOverridden { loan_id, .. } => *loan_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LoanEvent::LoanCreated { timestamp, .. } => *timestamp,
            LoanEvent::PaymentRecorded { timestamp, .. } => *timestamp,
            LoanEvent::PaymentReversed { timestamp, .. } => *timestamp,
            LoanEvent::ScheduleReanchored { timestamp, .. } => *timestamp,
            LoanEvent::StatusChanged { timestamp, .. } => *timestamp,
            LoanEvent::StatusOverridden { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            LoanEvent::LoanCreated { .. } => "LoanCreated",
            LoanEvent::PaymentRecorded { .. } => "PaymentRecorded",
            LoanEvent::PaymentReversed { .. } => "PaymentReversed",
            LoanEvent::ScheduleReanchored { .. } => "ScheduleReanchored",
            LoanEvent::StatusChanged { .. } => "StatusChanged",
            LoanEvent::StatusOverridden { .. } => "StatusOverridden",
        }
    }
}
