//! Amortization calculation
//!
//! This module computes the fixed financial terms of a loan at creation
//! time. Interest is flat: it is charged once on the full principal for
//! the whole term, not period by period. The resulting total is split
//! into equal installments, with the rounding remainder reconciled into
//! the final one so the installments always sum back to the total.

use core_kernel::{Money, Rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;

/// Fixed financial terms of a loan, derived once at creation
///
/// `total_payable` and the installments never change afterwards, even if
/// rates are edited on the product side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationTerms {
    /// Original amount lent
    pub principal: Money,
    /// Flat interest rate over the full term
    pub interest_rate: Rate,
    /// Number of collection periods
    pub term: u32,
    /// Principal plus flat interest
    pub total_payable: Money,
    /// Regular per-period installment (round-half-up to the cent)
    pub installment: Money,
    /// Final-period installment, absorbing the rounding remainder
    pub final_installment: Money,
}

impl AmortizationTerms {
    /// Computes the terms for a principal, rate, and term
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field when the
    /// principal is not positive, the rate is outside 0..=100 percent,
    /// or the term is zero. Inputs are never clamped.
    pub fn compute(principal: Money, interest_rate: Rate, term: u32) -> Result<Self, LendingError> {
        if !principal.is_positive() {
            return Err(LendingError::validation(
                "principal",
                "principal must be greater than zero",
            ));
        }
        if interest_rate.as_percent() < Decimal::ZERO {
            return Err(LendingError::validation(
                "interest_rate",
                "interest rate cannot be negative",
            ));
        }
        if interest_rate.as_percent() > Decimal::ONE_HUNDRED {
            return Err(LendingError::validation(
                "interest_rate",
                "interest rate cannot exceed 100 percent",
            ));
        }
        if term == 0 {
            return Err(LendingError::validation(
                "term",
                "term must be at least one period",
            ));
        }

        let total_payable = (principal + interest_rate.apply(&principal)).round_cents();
        let parts = total_payable.split_installments(term)?;
        let installment = parts[0];
        let final_installment = parts[parts.len() - 1];

        if !final_installment.is_positive() {
            return Err(LendingError::validation(
                "term",
                "principal is too small for the requested term",
            ));
        }

        Ok(Self {
            principal,
            interest_rate,
            term,
            total_payable,
            installment,
            final_installment,
        })
    }

    /// Expected amount for a 1-indexed period
    pub fn expected_amount(&self, period: u32) -> Money {
        if period == self.term {
            self.final_installment
        } else {
            self.installment
        }
    }

    /// Sum of all expected amounts; equals `total_payable` by construction
    pub fn total_expected(&self) -> Money {
        self.installment
            .multiply(Decimal::from(self.term - 1))
            + self.final_installment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn test_flat_rate_reference_case() {
        // 1000 at 20% over 12 periods: 1200 total, 100 per period
        let terms =
            AmortizationTerms::compute(money(dec!(1000)), Rate::from_percent(dec!(20)), 12)
                .unwrap();

        assert_eq!(terms.total_payable.amount(), dec!(1200.00));
        assert_eq!(terms.installment.amount(), dec!(100.00));
        assert_eq!(terms.final_installment.amount(), dec!(100.00));
    }

    #[test]
    fn test_rounding_remainder_goes_to_final_period() {
        let terms =
            AmortizationTerms::compute(money(dec!(1000)), Rate::from_percent(dec!(0)), 3).unwrap();

        assert_eq!(terms.installment.amount(), dec!(333.33));
        assert_eq!(terms.final_installment.amount(), dec!(333.34));
        assert_eq!(terms.total_expected(), terms.total_payable);
    }

    #[test]
    fn test_expected_amount_per_period() {
        let terms =
            AmortizationTerms::compute(money(dec!(500)), Rate::from_percent(dec!(10)), 7).unwrap();

        for period in 1..terms.term {
            assert_eq!(terms.expected_amount(period), terms.installment);
        }
        assert_eq!(terms.expected_amount(terms.term), terms.final_installment);
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let err = AmortizationTerms::compute(money(dec!(0)), Rate::from_percent(dec!(10)), 4)
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation { field, .. } if field == "principal"));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let err = AmortizationTerms::compute(money(dec!(100)), Rate::from_percent(dec!(-1)), 4)
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation { field, .. } if field == "interest_rate"));
    }

    #[test]
    fn test_rejects_rate_above_hundred() {
        let err = AmortizationTerms::compute(money(dec!(100)), Rate::from_percent(dec!(101)), 4)
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation { field, .. } if field == "interest_rate"));
    }

    #[test]
    fn test_rejects_zero_term() {
        let err = AmortizationTerms::compute(money(dec!(100)), Rate::from_percent(dec!(10)), 0)
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation { field, .. } if field == "term"));
    }

    #[test]
    fn test_compute_is_pure() {
        let a = AmortizationTerms::compute(money(dec!(750)), Rate::from_percent(dec!(15)), 10)
            .unwrap();
        let b = AmortizationTerms::compute(money(dec!(750)), Rate::from_percent(dec!(15)), 10)
            .unwrap();
        assert_eq!(a, b);
    }
}
