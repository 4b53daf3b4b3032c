//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{ClientId, CollectorId, Frequency, Money, Rate};
use domain_lending::{EngineConfig, Loan, LoanBuilder};

use crate::fixtures::{MoneyFixtures, RateFixtures, TemporalFixtures};

/// Builder for test loans
///
/// Defaults to the standard office case: 1000 at 20% flat over 12
/// weekly installments of 100, 5% mora, disbursed Jan 1 2024.
pub struct TestLoanBuilder {
    client_id: ClientId,
    collector_id: Option<CollectorId>,
    principal: Money,
    interest_rate: Rate,
    mora_rate: Rate,
    term: u32,
    frequency: Frequency,
    start_date: NaiveDate,
    paid_periods: u32,
}

impl Default for TestLoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLoanBuilder {
    /// Creates a builder with the standard defaults
    pub fn new() -> Self {
        Self {
            client_id: ClientId::new(),
            collector_id: None,
            principal: MoneyFixtures::principal_1000(),
            interest_rate: RateFixtures::interest_20(),
            mora_rate: RateFixtures::mora_5(),
            term: 12,
            frequency: Frequency::Weekly,
            start_date: TemporalFixtures::loan_start(),
            paid_periods: 0,
        }
    }

    /// Sets the borrower
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = client_id;
        self
    }

    /// Assigns a collector
    pub fn with_collector(mut self, collector_id: CollectorId) -> Self {
        self.collector_id = Some(collector_id);
        self
    }

    /// Sets the principal
    pub fn with_principal(mut self, principal: Money) -> Self {
        self.principal = principal;
        self
    }

    /// Sets the flat interest rate
    pub fn with_interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = rate;
        self
    }

    /// Sets the mora rate
    pub fn with_mora_rate(mut self, rate: Rate) -> Self {
        self.mora_rate = rate;
        self
    }

    /// Sets the term
    pub fn with_term(mut self, term: u32) -> Self {
        self.term = term;
        self
    }

    /// Sets the frequency
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the disbursement date
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Settles the first `n` periods with on-time payments after building
    pub fn with_paid_periods(mut self, n: u32) -> Self {
        self.paid_periods = n;
        self
    }

    /// Builds the loan, applying any requested on-time payments
    pub fn build(self) -> Loan {
        let mut builder = LoanBuilder::new()
            .client(self.client_id)
            .principal(self.principal)
            .interest_rate(self.interest_rate)
            .mora_rate(self.mora_rate)
            .term(self.term)
            .frequency(self.frequency)
            .start_date(self.start_date);
        if let Some(collector_id) = self.collector_id {
            builder = builder.collector(collector_id);
        }

        let mut loan = builder.build().expect("test loan builds");

        let config = EngineConfig::default();
        for _ in 0..self.paid_periods {
            let entry = loan.schedule()[loan.paid_periods() as usize];
            loan.apply_payment(entry.amount, entry.due_date, false, &config)
                .expect("on-time test payment applies");
        }
        loan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_lending::LoanStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_build_matches_standard_case() {
        let loan = TestLoanBuilder::new().build();
        assert_eq!(loan.total_payable().amount(), dec!(1200.00));
        assert_eq!(loan.installment().amount(), dec!(100.00));
        assert_eq!(loan.term(), 12);
    }

    #[test]
    fn test_paid_periods_are_settled_on_time() {
        let loan = TestLoanBuilder::new().with_paid_periods(3).build();
        assert_eq!(loan.paid_periods(), 3);
        assert!(loan.payments().iter().all(|p| p.on_time && p.settled_period));
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn test_fully_paid_build() {
        let loan = TestLoanBuilder::new().with_paid_periods(12).build();
        assert_eq!(loan.status(), LoanStatus::Paid);
    }
}
