//! Request handlers

pub mod cashbox;
pub mod health;
pub mod loans;
pub mod party;
