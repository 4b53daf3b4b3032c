//! Cash Register Domain - the office caja
//!
//! A flat, single-entry ledger of daily cash movements. Double-entry
//! bookkeeping is deliberately out of scope: the register mirrors the
//! paper book the office keeps, one row per movement, with a running
//! balance and a per-day close.

pub mod entry;
pub mod error;
pub mod register;

pub use entry::{CashEntry, EntryDirection};
pub use error::CashboxError;
pub use register::{CashRegister, DailySummary};
