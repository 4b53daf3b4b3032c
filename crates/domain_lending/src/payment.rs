//! Payment records
//!
//! A payment is always credited against exactly one period of one loan.
//! Partial payments keep their shortfall on the record; a payment that
//! completes its period is marked as settling it.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{LoanId, Money, PaymentId};
use serde::{Deserialize, Serialize};

/// A recorded collection against a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Loan this payment belongs to
    pub loan_id: LoanId,
    /// 1-indexed period the amount was credited against
    pub period: u32,
    /// Cash received
    pub amount: Money,
    /// Business date the payment was made
    pub payment_date: NaiveDate,
    /// Mora charged by this payment (zero when on time)
    pub mora_charged: Money,
    /// Amount still missing for the period after this payment
    pub shortfall: Money,
    /// Excess received above the required amount
    pub overpayment: Money,
    /// Whether the payment arrived on or before the due date
    pub on_time: bool,
    /// Whether this payment completed its period
    pub settled_period: bool,
    /// When the payment was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    /// Returns true if this payment left a shortfall on its period
    pub fn is_partial(&self) -> bool {
        self.shortfall.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_flag_follows_shortfall() {
        let payment = Payment {
            id: PaymentId::new_v7(),
            loan_id: LoanId::new_v7(),
            period: 1,
            amount: Money::new(dec!(60)),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            mora_charged: Money::zero(),
            shortfall: Money::new(dec!(40)),
            overpayment: Money::zero(),
            on_time: true,
            settled_period: false,
            recorded_at: Utc::now(),
        };

        assert!(payment.is_partial());
        assert!(!Payment { shortfall: Money::zero(), ..payment }.is_partial());
    }
}
