//! Cash register behavior across multiple days

use chrono::NaiveDate;
use core_kernel::{CollectorId, LoanId, Money};
use domain_cashbox::{CashEntry, CashRegister, CashboxError, EntryDirection};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_week_of_collections_balances_out() {
    let mut register = CashRegister::new();
    let loan_id = LoanId::new();
    let collector_id = CollectorId::new();

    // Monday: disburse a loan, collect two installments on the route
    register
        .post(
            CashEntry::new(
                date(2024, 1, 8),
                EntryDirection::Expense,
                "desembolso prestamo",
                Money::new(dec!(1000)),
            )
            .unwrap()
            .with_loan(loan_id),
        )
        .unwrap();

    for _ in 0..2 {
        register
            .post(
                CashEntry::new(
                    date(2024, 1, 8),
                    EntryDirection::Income,
                    "cobro cuota",
                    Money::new(dec!(100)),
                )
                .unwrap()
                .with_loan(loan_id)
                .with_collector(collector_id),
            )
            .unwrap();
    }

    // Tuesday: one more collection
    register
        .post(
            CashEntry::new(
                date(2024, 1, 9),
                EntryDirection::Income,
                "cobro cuota",
                Money::new(dec!(100)),
            )
            .unwrap()
            .with_loan(loan_id),
        )
        .unwrap();

    let monday = register.daily_summary(date(2024, 1, 8));
    assert_eq!(monday.closing.amount(), dec!(-800));

    let tuesday = register.daily_summary(date(2024, 1, 9));
    assert_eq!(tuesday.opening, monday.closing);
    assert_eq!(tuesday.closing.amount(), dec!(-700));
    assert_eq!(register.balance(), tuesday.closing);
}

#[test]
fn test_duplicate_rows_are_rejected() {
    let mut register = CashRegister::new();
    let entry = CashEntry::new(
        date(2024, 1, 8),
        EntryDirection::Income,
        "cobro",
        Money::new(dec!(50)),
    )
    .unwrap();

    register.post(entry.clone()).unwrap();
    let err = register.post(entry).unwrap_err();
    assert!(matches!(err, CashboxError::Validation { field, .. } if field == "id"));
}

#[test]
fn test_entries_restore_in_chronological_order() {
    let newer = CashEntry::new(
        date(2024, 1, 9),
        EntryDirection::Income,
        "cobro",
        Money::new(dec!(10)),
    )
    .unwrap();
    let older = CashEntry::new(
        date(2024, 1, 8),
        EntryDirection::Income,
        "cobro",
        Money::new(dec!(20)),
    )
    .unwrap();

    let register = CashRegister::from_entries(vec![newer, older]);
    assert_eq!(register.entries()[0].entry_date, date(2024, 1, 8));
}
