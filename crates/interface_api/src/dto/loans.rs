//! Loan DTOs
//!
//! Monetary values cross the wire as decimal strings, never floats, and
//! dates are plain `YYYY-MM-DD` with no time component.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_lending::{loan_summary, Loan, Payment, ScheduleEntry};

/// Amortization preview request (no persistence)
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub interest_rate_percent: Decimal,
    pub term: u32,
}

/// Amortization preview response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_payable: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_installment: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub client_id: Uuid,
    pub collector_id: Option<Uuid>,
    #[serde(with = "rust_decimal::serde::str")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub interest_rate_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub mora_rate_percent: Decimal,
    pub term: u32,
    pub frequency: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    /// Explicit confirmation for a below-required payment
    #[serde(default)]
    pub allow_partial: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChangePaymentDayRequest {
    pub new_anchor: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// ACTIVO | ATRASADO | PAGADO, or null to return to automatic derivation
    pub status: Option<String>,
    pub actor: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleEntryResponse {
    pub period: u32,
    pub due_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub settled: bool,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub period: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub mora_charged: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub shortfall: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub overpayment: Decimal,
    pub on_time: bool,
    pub settled_period: bool,
}

impl PaymentResponse {
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            id: payment.id.into(),
            period: payment.period,
            amount: payment.amount.amount(),
            payment_date: payment.payment_date,
            mora_charged: payment.mora_charged.amount(),
            shortfall: payment.shortfall.amount(),
            overpayment: payment.overpayment.amount(),
            on_time: payment.on_time,
            settled_period: payment.settled_period,
        }
    }
}

/// The complete post-mutation aggregate
///
/// Every mutating endpoint returns this, so the client never needs a
/// follow-up read to learn the new state.
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub collector_id: Option<Uuid>,
    #[serde(with = "rust_decimal::serde::str")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub interest_rate_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub mora_rate_percent: Decimal,
    pub term: u32,
    pub frequency: String,
    pub start_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_payable: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installment: Decimal,
    pub paid_periods: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub accrued_mora: Decimal,
    pub status: String,
    pub status_overridden: bool,
    pub next_due_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub outstanding_balance: Decimal,
    pub schedule: Vec<ScheduleEntryResponse>,
    pub payments: Vec<PaymentResponse>,
    pub version: u32,
}

impl LoanResponse {
    /// Builds the full aggregate view as of the given business date
    pub fn from_loan(loan: &Loan, today: NaiveDate) -> Self {
        let summary = loan_summary(loan, today);
        let schedule = loan
            .schedule()
            .iter()
            .map(|entry: &ScheduleEntry| ScheduleEntryResponse {
                period: entry.period,
                due_date: entry.due_date,
                amount: entry.amount.amount(),
                settled: entry.period <= loan.paid_periods(),
            })
            .collect();
        let payments = loan.payments().iter().map(PaymentResponse::from_payment).collect();

        Self {
            id: loan.id().into(),
            client_id: loan.client_id().into(),
            collector_id: loan.collector_id().map(Into::into),
            principal: loan.principal().amount(),
            interest_rate_percent: loan.interest_rate().as_percent(),
            mora_rate_percent: loan.mora_rate().as_percent(),
            term: loan.term(),
            frequency: loan.frequency().to_string(),
            start_date: loan.start_date(),
            total_payable: loan.total_payable().amount(),
            installment: loan.installment().amount(),
            paid_periods: loan.paid_periods(),
            accrued_mora: loan.accrued_mora().amount(),
            status: summary.status.to_string(),
            status_overridden: loan.status_override().is_some(),
            next_due_date: summary.next_due_date,
            total_paid: summary.total_paid.amount(),
            outstanding_balance: summary.outstanding_balance.amount(),
            schedule,
            payments,
            version: loan.version(),
        }
    }
}
