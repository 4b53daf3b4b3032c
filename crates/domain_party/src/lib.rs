//! Party Domain - client and collector registries
//!
//! Thin CRUD entities with field validation. All the interesting
//! behavior lives in the lending engine; this crate only keeps the
//! registry data honest.

pub mod client;
pub mod collector;
pub mod error;
pub mod validation;

pub use client::Client;
pub use collector::{Collector, CollectorStatus};
pub use error::PartyError;
