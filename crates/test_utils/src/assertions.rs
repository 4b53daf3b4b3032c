//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types with more meaningful
//! failure messages than bare assert_eq.

use core_kernel::Money;
use domain_lending::Loan;
use rust_decimal::Decimal;

/// Asserts that two Money values are equal within a tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money.amount());
}

/// Asserts that money values sum exactly to a total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum: Money = parts.iter().copied().sum();
    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts the settled-period contiguity invariant on a loan
///
/// Settled periods must be exactly 1..=paid_periods with no gaps, and
/// every unsettled payment must target the next unpaid period.
pub fn assert_settled_contiguous(loan: &Loan) {
    let mut settled: Vec<u32> = loan
        .payments()
        .iter()
        .filter(|p| p.settled_period)
        .map(|p| p.period)
        .collect();
    settled.sort_unstable();
    settled.dedup();

    let expected: Vec<u32> = (1..=loan.paid_periods()).collect();
    assert_eq!(
        settled, expected,
        "settled periods are not contiguous from 1"
    );

    for payment in loan.payments().iter().filter(|p| !p.settled_period) {
        assert_eq!(
            payment.period,
            loan.paid_periods() + 1,
            "partial payment targets a period other than the frontier"
        );
    }
}

/// Asserts that the schedule's expected amounts reconcile to the total
pub fn assert_schedule_reconciles(loan: &Loan) {
    let amounts: Vec<Money> = loan.schedule().iter().map(|e| e.amount).collect();
    assert_money_sum_equals(&amounts, &loan.total_payable());
}
