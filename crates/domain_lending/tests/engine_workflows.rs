//! End-to-end workflows for the lending engine
//!
//! These tests drive the full path a real collection goes through:
//! creation, scheduled payments, late payments with mora, partials,
//! reversals, and payment-day changes.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{ClientId, Frequency, Money, Rate};
use domain_lending::{
    loan_summary, outstanding_balance, total_paid, EngineConfig, LendingError, Loan, LoanBuilder,
    LoanStatus, MoraPolicy,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The standard case used throughout the office: 1000 lent at 20% flat
/// over 12 weekly installments of 100.
fn standard_loan() -> Loan {
    LoanBuilder::new()
        .client(ClientId::new())
        .principal(Money::new(dec!(1000)))
        .interest_rate(Rate::from_percent(dec!(20)))
        .mora_rate(Rate::from_percent(dec!(5)))
        .term(12)
        .frequency(Frequency::Weekly)
        .start_date(date(2024, 1, 1))
        .build()
        .expect("standard loan builds")
}

mod full_collection_cycle {
    use super::*;

    #[test]
    fn test_loan_collected_to_completion() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        for k in 0..12u32 {
            let due = date(2024, 1, 8) + chrono::Duration::weeks(i64::from(k));
            let payment = loan
                .apply_payment(Money::new(dec!(100)), due, false, &config)
                .unwrap();
            assert!(payment.settled_period);
            assert_eq!(loan.paid_periods(), k + 1);
        }

        assert_eq!(loan.status(), LoanStatus::Paid);
        assert_eq!(total_paid(&loan), loan.total_payable());
        assert_eq!(outstanding_balance(&loan), Money::zero());
    }

    #[test]
    fn test_cash_collected_matches_total_payable_with_uneven_installments() {
        // 500 at 10% over 7 periods: 550 total, 78.57 × 6 + 78.58
        let mut loan = LoanBuilder::new()
            .client(ClientId::new())
            .principal(Money::new(dec!(500)))
            .interest_rate(Rate::from_percent(dec!(10)))
            .term(7)
            .frequency(Frequency::Weekly)
            .start_date(date(2024, 1, 1))
            .build()
            .unwrap();
        let config = EngineConfig::default();

        assert_eq!(loan.installment().amount(), dec!(78.57));
        assert_eq!(loan.final_installment().amount(), dec!(78.58));

        for entry in loan.schedule().to_vec() {
            loan.apply_payment(entry.amount, entry.due_date, false, &config)
                .unwrap();
        }

        assert_eq!(loan.status(), LoanStatus::Paid);
        assert_eq!(total_paid(&loan).amount(), dec!(550.00));
    }
}

mod late_payments {
    use super::*;

    #[test]
    fn test_three_days_late_charges_five_percent() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        // Installment 100 due 2024-01-08, paid 2024-01-11 with 5% mora
        let payment = loan
            .apply_payment(Money::new(dec!(105)), date(2024, 1, 11), false, &config)
            .unwrap();

        assert_eq!(payment.mora_charged.amount(), dec!(5.00));
        assert!(!payment.on_time);
        assert!(payment.settled_period);
    }

    #[test]
    fn test_overdue_loan_recovers_to_active_when_caught_up() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        // A week past the first due date the loan reads overdue
        assert_eq!(loan.status_as_of(date(2024, 1, 15)), LoanStatus::Overdue);

        // Settling the overdue installment (with mora) brings it back
        loan.apply_payment(Money::new(dec!(105)), date(2024, 1, 12), false, &config)
            .unwrap();
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.status_as_of(date(2024, 1, 14)), LoanStatus::Active);
    }

    #[test]
    fn test_underpaying_mora_leaves_loan_overdue() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        // Late payment covering the installment but not the 5.00 mora
        let payment = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 11), true, &config)
            .unwrap();

        assert!(!payment.settled_period);
        assert_eq!(payment.shortfall.amount(), dec!(5.00));
        assert_eq!(loan.accrued_mora().amount(), dec!(5.00));
        assert_eq!(loan.status(), LoanStatus::Overdue);
    }

    #[test]
    fn test_cumulative_mora_policy_counts_every_missed_period() {
        let mut loan = standard_loan();
        let config = EngineConfig {
            mora: MoraPolicy::PerMissedPeriod,
            ..EngineConfig::default()
        };

        // Three periods overdue by 2024-01-25 (due Jan 8, 15, 22)
        let payment = loan
            .apply_payment(Money::new(dec!(115)), date(2024, 1, 25), false, &config)
            .unwrap();

        assert_eq!(payment.mora_charged.amount(), dec!(15.00));
        assert!(payment.settled_period);
    }
}

mod partial_payments {
    use super::*;

    #[test]
    fn test_unconfirmed_partial_soft_stops() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        let err = loan
            .apply_payment(Money::new(dec!(60)), date(2024, 1, 8), false, &config)
            .unwrap_err();

        match err {
            LendingError::PartialPaymentRequiresConfirmation { required, offered } => {
                assert_eq!(required.amount(), dec!(100));
                assert_eq!(offered.amount(), dec!(60));
            }
            other => panic!("expected confirmation soft-stop, got {other}"),
        }

        // Resubmitting with confirmation records the partial
        let payment = loan
            .apply_payment(Money::new(dec!(60)), date(2024, 1, 8), true, &config)
            .unwrap();
        assert_eq!(payment.shortfall.amount(), dec!(40));
        assert_eq!(loan.paid_periods(), 0);
    }

    #[test]
    fn test_partial_never_advances_the_counter() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(30)), date(2024, 1, 8), true, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(30)), date(2024, 1, 8), true, &config)
            .unwrap();
        assert_eq!(loan.paid_periods(), 0);

        // The closing 40 settles the period
        let closing = loan
            .apply_payment(Money::new(dec!(40)), date(2024, 1, 8), true, &config)
            .unwrap();
        assert!(closing.settled_period);
        assert_eq!(loan.paid_periods(), 1);
    }
}

mod reversals {
    use super::*;

    #[test]
    fn test_round_trip_restores_business_state() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        let before = (
            loan.paid_periods(),
            loan.accrued_mora(),
            loan.status(),
            total_paid(&loan),
            outstanding_balance(&loan),
        );

        let payment = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 15), false, &config)
            .unwrap();
        loan.reverse_payment(payment.id, date(2024, 1, 15)).unwrap();

        let after = (
            loan.paid_periods(),
            loan.accrued_mora(),
            loan.status(),
            total_paid(&loan),
            outstanding_balance(&loan),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_double_reversal_reports_not_found() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        let payment = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        loan.reverse_payment(payment.id, date(2024, 1, 8)).unwrap();
        let err = loan.reverse_payment(payment.id, date(2024, 1, 8)).unwrap_err();
        assert!(matches!(err, LendingError::PaymentNotFound(_)));
    }

    #[test]
    fn test_reversal_reopens_a_paid_loan() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        let mut last_payment_id = None;
        for k in 0..12u32 {
            let due = date(2024, 1, 8) + chrono::Duration::weeks(i64::from(k));
            let payment = loan
                .apply_payment(Money::new(dec!(100)), due, false, &config)
                .unwrap();
            last_payment_id = Some(payment.id);
        }
        assert_eq!(loan.status(), LoanStatus::Paid);

        loan.reverse_payment(last_payment_id.unwrap(), date(2024, 3, 25))
            .unwrap();
        assert_eq!(loan.paid_periods(), 11);
        assert_ne!(loan.status(), LoanStatus::Paid);

        // And the reopened period can be collected again
        loan.apply_payment(Money::new(dec!(100)), date(2024, 3, 25), true, &config)
            .unwrap();
        assert_eq!(loan.status_as_of(date(2024, 3, 26)), LoanStatus::Paid);
    }
}

mod payment_day_changes {
    use super::*;

    #[test]
    fn test_reschedule_midway_through_collection() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 15), false, &config)
            .unwrap();

        let historical: Vec<_> = loan.schedule()[..2].to_vec();

        // Client asks to pay on Fridays starting in February
        loan.change_payment_day(date(2024, 2, 2), date(2024, 1, 20))
            .unwrap();

        assert_eq!(&loan.schedule()[..2], historical.as_slice());
        assert_eq!(loan.schedule()[2].due_date, date(2024, 2, 9));
        for pair in loan.schedule()[2..].windows(2) {
            assert_eq!((pair[1].due_date - pair[0].due_date).num_days(), 7);
        }

        // Collection continues against the new dates
        let payment = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 2, 9), false, &config)
            .unwrap();
        assert!(payment.on_time);
    }

    #[test]
    fn test_reschedule_rejected_for_paid_loan() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        for k in 0..12u32 {
            let due = date(2024, 1, 8) + chrono::Duration::weeks(i64::from(k));
            loan.apply_payment(Money::new(dec!(100)), due, false, &config)
                .unwrap();
        }

        let err = loan
            .change_payment_day(date(2024, 5, 1), date(2024, 4, 1))
            .unwrap_err();
        assert!(matches!(err, LendingError::LoanAlreadyPaid));
    }
}

mod summaries {
    use super::*;

    #[test]
    fn test_summary_reflects_collection_state() {
        let mut loan = standard_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(105)), date(2024, 1, 18), false, &config)
            .unwrap();

        let summary = loan_summary(&loan, date(2024, 1, 20));
        assert_eq!(summary.paid_periods, 2);
        assert_eq!(summary.total_paid.amount(), dec!(205));
        assert_eq!(summary.outstanding_balance.amount(), dec!(1000));
        assert_eq!(summary.next_due_date, Some(date(2024, 1, 22)));
        assert_eq!(summary.status, LoanStatus::Active);
    }
}
