//! Infrastructure Database Layer
//!
//! This crate provides database access for the lending system on
//! PostgreSQL using SQLx, following the repository pattern: the domain
//! crates never see SQL.
//!
//! # Concurrency
//!
//! Loans carry a version token; [`repositories::LoanRepository::save`]
//! compare-and-swaps on it inside a transaction, so two concurrent
//! payment applications against the same loan can never both win. The
//! loser receives `DatabaseError::ConcurrentModification` and the caller
//! retries the whole read-apply-save cycle.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, LoanRepository};
//!
//! let pool = create_pool_from_url("postgres://localhost/prestavia").await?;
//! let repo = LoanRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{CashboxRepository, ClientRepository, CollectorRepository, LoanRepository};
