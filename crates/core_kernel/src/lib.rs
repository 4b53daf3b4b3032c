//! Core Kernel - Foundational types and utilities for the lending system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and Rate types with precise decimal arithmetic
//! - Calendar arithmetic for collection schedules
//! - Common identifiers and value objects

pub mod identifiers;
pub mod money;
pub mod temporal;

pub use identifiers::{AuditEventId, CashEntryId, ClientId, CollectorId, LoanId, PaymentId};
pub use money::{Money, MoneyError, Rate};
pub use temporal::{reference_instant, Frequency, TemporalError, Timezone};
