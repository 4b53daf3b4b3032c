//! Repository implementations

pub mod cashbox;
pub mod clients;
pub mod collectors;
pub mod loans;

pub use cashbox::CashboxRepository;
pub use clients::ClientRepository;
pub use collectors::CollectorRepository;
pub use loans::LoanRepository;
