//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities. Fixtures are consistent
//! and predictable, so assertions can use exact values.

use chrono::NaiveDate;
use core_kernel::{ClientId, CollectorId, LoanId, Money, Rate};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;
use uuid::Uuid;

use domain_party::{Client, Collector};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The standard installment amount used across tests
    pub fn installment_100() -> Money {
        Money::new(dec!(100.00))
    }

    /// The standard principal
    pub fn principal_1000() -> Money {
        Money::new(dec!(1000.00))
    }

    /// A principal that divides unevenly over most terms
    pub fn uneven_principal() -> Money {
        Money::new(dec!(500.00))
    }
}

/// Fixture for rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// The standard 20% flat interest rate
    pub fn interest_20() -> Rate {
        Rate::from_percent(dec!(20))
    }

    /// The standard 5% mora rate
    pub fn mora_5() -> Rate {
        Rate::from_percent(dec!(5))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard disbursement date (Mon, Jan 1 2024)
    pub fn loan_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// First weekly due date after [`Self::loan_start`]
    pub fn first_weekly_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    /// Three days past the first due date
    pub fn first_due_plus_three() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic client ID for testing
    pub fn client_id() -> ClientId {
        ClientId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic collector ID for testing
    pub fn collector_id() -> CollectorId {
        CollectorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic loan ID for testing
    pub fn loan_id() -> LoanId {
        LoanId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }
}

/// Fixture for registry entities
pub struct PartyFixtures;

impl PartyFixtures {
    /// A valid client with fixed details
    pub fn client() -> Client {
        Client::new("Maria Perez", "001-1234567-8")
            .unwrap()
            .with_phone("809-555-0134")
            .unwrap()
    }

    /// A client with a randomized name, for bulk scenarios
    pub fn random_client(sequence: u32) -> Client {
        let name: String = Name().fake();
        Client::new(name, format!("001-{:07}-{}", sequence, sequence % 10)).unwrap()
    }

    /// A valid collector with fixed details
    pub fn collector() -> Collector {
        Collector::new("Pedro Gomez").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_deterministic() {
        assert_eq!(IdFixtures::client_id(), IdFixtures::client_id());
        assert_eq!(MoneyFixtures::installment_100(), MoneyFixtures::installment_100());
    }

    #[test]
    fn test_random_clients_have_unique_documents() {
        let a = PartyFixtures::random_client(1);
        let b = PartyFixtures::random_client(2);
        assert_ne!(a.document_id, b.document_id);
    }
}
