//! Request/response data transfer objects

pub mod cashbox;
pub mod loans;
pub mod party;
