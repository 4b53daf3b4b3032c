//! Read-only projections over loan aggregates
//!
//! Everything here is a pure view: nothing mutates the aggregate, and the
//! same inputs always produce the same report.

use chrono::NaiveDate;
use core_kernel::{CollectorId, Money};
use serde::Serialize;

use crate::loan::Loan;
use crate::payment::Payment;
use crate::status::LoanStatus;

/// Collection totals for a single loan
#[derive(Debug, Clone, Serialize)]
pub struct LoanSummary {
    pub paid_periods: u32,
    pub term: u32,
    /// Cash received across all payments, including mora and overpayments
    pub total_paid: Money,
    /// Installments still owed plus outstanding mora
    pub outstanding_balance: Money,
    pub accrued_mora: Money,
    pub status: LoanStatus,
    pub next_due_date: Option<NaiveDate>,
}

/// Builds the collection summary for a loan
pub fn loan_summary(loan: &Loan, today: NaiveDate) -> LoanSummary {
    LoanSummary {
        paid_periods: loan.paid_periods(),
        term: loan.term(),
        total_paid: total_paid(loan),
        outstanding_balance: outstanding_balance(loan),
        accrued_mora: loan.accrued_mora(),
        status: loan.status_as_of(today),
        next_due_date: loan.next_due_date(),
    }
}

/// Cash received to date across every recorded payment
pub fn total_paid(loan: &Loan) -> Money {
    loan.payments().iter().map(|p| p.amount).sum()
}

/// Amount still owed: unsettled installments, minus partial progress on
/// the current period, plus uncollected mora
pub fn outstanding_balance(loan: &Loan) -> Money {
    let remaining_installments: Money = loan
        .schedule()
        .iter()
        .filter(|entry| entry.period > loan.paid_periods())
        .map(|entry| entry.amount)
        .sum();

    let partial_progress: Money = loan
        .payments()
        .iter()
        .filter(|p| p.period > loan.paid_periods() && !p.settled_period)
        .map(|p| p.amount)
        .sum();

    remaining_installments.saturating_sub(partial_progress) + loan.accrued_mora()
}

/// Payment history ordered by period, then by recording time
pub fn payment_history(loan: &Loan) -> Vec<&Payment> {
    let mut history: Vec<&Payment> = loan.payments().iter().collect();
    history.sort_by_key(|p| (p.period, p.recorded_at));
    history
}

/// Per-period settlement state, for the collection card view
#[derive(Debug, Clone, Serialize)]
pub struct PeriodView {
    pub period: u32,
    pub due_date: NaiveDate,
    pub expected: Money,
    pub collected: Money,
    pub settled: bool,
}

/// Builds the period-by-period settlement view
pub fn settlement_view(loan: &Loan) -> Vec<PeriodView> {
    loan.schedule()
        .iter()
        .map(|entry| {
            let collected = loan
                .payments()
                .iter()
                .filter(|p| p.period == entry.period)
                .map(|p| p.amount)
                .sum();
            PeriodView {
                period: entry.period,
                due_date: entry.due_date,
                expected: entry.amount,
                collected,
                settled: entry.period <= loan.paid_periods(),
            }
        })
        .collect()
}

/// Portfolio totals for one collector's route
#[derive(Debug, Clone, Serialize)]
pub struct CollectorPortfolio {
    pub collector_id: CollectorId,
    pub loan_count: usize,
    pub outstanding_total: Money,
    pub overdue_count: usize,
}

/// Aggregates portfolio totals for a collector over a set of loans
pub fn collector_portfolio(
    collector_id: CollectorId,
    loans: &[Loan],
    today: NaiveDate,
) -> CollectorPortfolio {
    let route: Vec<&Loan> = loans
        .iter()
        .filter(|loan| loan.collector_id() == Some(collector_id))
        .collect();

    CollectorPortfolio {
        collector_id,
        loan_count: route.len(),
        outstanding_total: route.iter().map(|loan| outstanding_balance(loan)).sum(),
        overdue_count: route
            .iter()
            .filter(|loan| loan.status_as_of(today) == LoanStatus::Overdue)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::loan::LoanBuilder;
    use core_kernel::{ClientId, Frequency, Rate};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan_with_collector(collector: Option<CollectorId>) -> Loan {
        let mut builder = LoanBuilder::new()
            .client(ClientId::new())
            .principal(Money::new(dec!(1000)))
            .interest_rate(Rate::from_percent(dec!(20)))
            .mora_rate(Rate::from_percent(dec!(5)))
            .term(12)
            .frequency(Frequency::Weekly)
            .start_date(date(2024, 1, 1));
        if let Some(id) = collector {
            builder = builder.collector(id);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_fresh_loan_summary() {
        let loan = loan_with_collector(None);
        let summary = loan_summary(&loan, date(2024, 1, 2));

        assert_eq!(summary.total_paid, Money::zero());
        assert_eq!(summary.outstanding_balance.amount(), dec!(1200.00));
        assert_eq!(summary.status, LoanStatus::Active);
        assert_eq!(summary.next_due_date, Some(date(2024, 1, 8)));
    }

    #[test]
    fn test_totals_after_payments() {
        let mut loan = loan_with_collector(None);
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(60)), date(2024, 1, 15), true, &config)
            .unwrap();

        assert_eq!(total_paid(&loan).amount(), dec!(160));
        // 1100 unsettled minus 60 partial progress
        assert_eq!(outstanding_balance(&loan).amount(), dec!(1040));
    }

    #[test]
    fn test_paid_loan_has_zero_outstanding() {
        let mut loan = loan_with_collector(None);
        let config = EngineConfig::default();

        for k in 0..12 {
            let pay_date = date(2024, 1, 8) + chrono::Duration::weeks(k);
            loan.apply_payment(Money::new(dec!(100)), pay_date, false, &config)
                .unwrap();
        }

        assert_eq!(outstanding_balance(&loan), Money::zero());
        assert_eq!(total_paid(&loan), loan.total_payable());
    }

    #[test]
    fn test_settlement_view_tracks_progress() {
        let mut loan = loan_with_collector(None);
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        let view = settlement_view(&loan);
        assert_eq!(view.len(), 12);
        assert!(view[0].settled);
        assert_eq!(view[0].collected.amount(), dec!(100));
        assert!(!view[1].settled);
        assert_eq!(view[1].collected, Money::zero());
    }

    #[test]
    fn test_payment_history_is_ordered() {
        let mut loan = loan_with_collector(None);
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(50)), date(2024, 1, 15), true, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(50)), date(2024, 1, 15), true, &config)
            .unwrap();

        let history = payment_history(&loan);
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].period <= w[1].period));
    }

    #[test]
    fn test_collector_portfolio_filters_route() {
        let collector = CollectorId::new();
        let mut on_route = loan_with_collector(Some(collector));
        let off_route = loan_with_collector(None);
        let config = EngineConfig::default();

        on_route
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        let loans = vec![on_route, off_route];
        let portfolio = collector_portfolio(collector, &loans, date(2024, 1, 10));

        assert_eq!(portfolio.loan_count, 1);
        assert_eq!(portfolio.outstanding_total.amount(), dec!(1100));
        assert_eq!(portfolio.overdue_count, 0);
    }
}
