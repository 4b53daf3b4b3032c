//! Lending Domain - Amortization & Payment Ledger Engine
//!
//! This crate is the core of the back office: the one subsystem that
//! carries real invariants. Everything else in the system is thin glue
//! over it.
//!
//! # Components
//!
//! - **Amortization calculator**: flat-rate terms fixed at creation, with
//!   the rounding remainder reconciled into the final installment
//! - **Schedule generator**: weekly/biweekly/monthly due dates, re-anchored
//!   for unpaid periods when the payment day changes
//! - **Payment engine**: full, partial, late, and reversed payments against
//!   the contiguous settled-period frontier
//! - **Status state machine**: ACTIVO / ATRASADO / PAGADO derived from the
//!   collection state, with audited operator overrides
//! - **Projections**: read-only totals and views
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_lending::{LoanBuilder, EngineConfig};
//!
//! let mut loan = LoanBuilder::new()
//!     .client(client_id)
//!     .principal(principal)
//!     .interest_rate(rate)
//!     .term(12)
//!     .start_date(start)
//!     .build()?;
//!
//! let payment = loan.apply_payment(amount, today, false, &EngineConfig::default())?;
//! ```

pub mod amortization;
pub mod config;
pub mod error;
pub mod events;
pub mod loan;
pub mod payment;
pub mod projections;
pub mod schedule;
pub mod status;

pub use amortization::AmortizationTerms;
pub use config::{DeletePolicy, EngineConfig, MoraPolicy, OverpaymentPolicy};
pub use error::LendingError;
pub use events::LoanEvent;
pub use loan::{Loan, LoanBuilder, StoredLoan};
pub use payment::Payment;
pub use projections::{
    collector_portfolio, loan_summary, outstanding_balance, payment_history, settlement_view,
    total_paid, CollectorPortfolio, LoanSummary, PeriodView,
};
pub use schedule::{generate_schedule, reanchor_schedule, ScheduleEntry};
pub use status::{derive_status, LoanStatus, StatusOverride};
