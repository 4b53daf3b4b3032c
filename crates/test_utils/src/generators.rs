//! Property-based test data generators
//!
//! Proptest strategies for the value ranges the engine accepts.

use core_kernel::{Frequency, Money, Rate};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for loan principals (100.00 to 1,000,000.00)
pub fn principal() -> impl Strategy<Value = Money> {
    (10_000i64..100_000_000i64).prop_map(Money::from_cents)
}

/// Strategy for valid interest/mora rates (0 to 100 percent)
pub fn rate_percent() -> impl Strategy<Value = Rate> {
    (0u32..=100u32).prop_map(|p| Rate::from_percent(Decimal::from(p)))
}

/// Strategy for loan terms (1 to 104 periods)
pub fn term() -> impl Strategy<Value = u32> {
    1u32..=104u32
}

/// Strategy for collection frequencies
pub fn frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Weekly),
        Just(Frequency::Biweekly),
        Just(Frequency::Monthly),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_lending::AmortizationTerms;

    proptest! {
        #[test]
        fn generated_inputs_always_amortize(
            principal in principal(),
            rate in rate_percent(),
            term in term()
        ) {
            let terms = AmortizationTerms::compute(principal, rate, term).unwrap();
            prop_assert_eq!(terms.total_expected(), terms.total_payable);
        }

        #[test]
        fn generated_frequencies_step_forward(
            frequency in frequency(),
            periods in 1u32..24u32
        ) {
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
            prop_assert!(frequency.advance(start, periods) > start);
        }
    }
}
