//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! The register operates in a single currency, so `Money` wraps a bare
//! decimal amount kept to cent precision.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use thiserror::Error;

/// Decimal places for cent precision
const CENT_DP: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot split into zero parts")]
    ZeroParts,
}

/// A monetary amount in the register's operating currency
///
/// Money uses rust_decimal for precise arithmetic without floating-point
/// errors. Installment math rounds half-up to the cent; exact values are
/// preserved until an explicit rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates Money from an integer amount of cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, CENT_DP))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to the cent using round-half-up
    ///
    /// Installments and charges are quoted half-up, matching how the
    /// register rounds amounts shown to collectors.
    pub fn round_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CENT_DP, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by a scalar (e.g., for rate calculations)
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self(self.0 / divisor))
    }

    /// Saturating subtraction: returns zero instead of going negative
    pub fn saturating_sub(&self, other: Money) -> Self {
        if other.0 >= self.0 {
            Self::zero()
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Splits the total into `n` per-period installments
    ///
    /// The first `n - 1` parts are the total divided by `n`, rounded
    /// half-up to the cent; the final part absorbs the rounding remainder
    /// so that the parts always sum back to the exact total.
    pub fn split_installments(&self, n: u32) -> Result<Vec<Money>, MoneyError> {
        if n == 0 {
            return Err(MoneyError::ZeroParts);
        }

        let base = self.divide(Decimal::from(n))?.round_cents();
        let mut parts = vec![base; n as usize];
        let allocated = base.multiply(Decimal::from(n - 1));
        parts[n as usize - 1] = *self - allocated;

        Ok(parts)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        self.multiply(factor)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, divisor: Decimal) -> Self {
        self.divide(divisor).expect("Division by zero in Money::div")
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Represents a percentage rate (interest rate, late-fee rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal fraction (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal fraction (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percent(percent: Decimal) -> Self {
        Self {
            value: percent / dec!(100),
        }
    }

    /// Returns the rate as a decimal fraction
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percent(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent().round_dp(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_from_cents() {
        let m = Money::from_cents(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
    }

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(Money::new(dec!(33.335)).round_cents().amount(), dec!(33.34));
        assert_eq!(Money::new(dec!(33.334)).round_cents().amount(), dec!(33.33));
    }

    #[test]
    fn test_saturating_sub() {
        let a = Money::new(dec!(10));
        let b = Money::new(dec!(25));
        assert_eq!(a.saturating_sub(b), Money::zero());
        assert_eq!(b.saturating_sub(a).amount(), dec!(15));
    }

    #[test]
    fn test_split_exact() {
        let parts = Money::new(dec!(1200.00)).split_installments(12).unwrap();
        assert_eq!(parts.len(), 12);
        assert!(parts.iter().all(|p| p.amount() == dec!(100.00)));
    }

    #[test]
    fn test_split_remainder_lands_on_last() {
        let parts = Money::new(dec!(1000.00)).split_installments(3).unwrap();
        assert_eq!(parts[0].amount(), dec!(333.33));
        assert_eq!(parts[1].amount(), dec!(333.33));
        assert_eq!(parts[2].amount(), dec!(333.34));
    }

    #[test]
    fn test_split_zero_parts() {
        let result = Money::new(dec!(100)).split_installments(0);
        assert_eq!(result, Err(MoneyError::ZeroParts));
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percent(dec!(5.0));
        let amount = Money::new(dec!(1000.00));

        let charge = rate.apply(&amount);
        assert_eq!(charge.amount(), dec!(50.00));
    }
}
