//! Loan Aggregate Root
//!
//! The Loan aggregate is the consistency boundary for the collection
//! engine. Every mutation (applying a payment, reversing one, moving the
//! payment day, forcing a status) happens through it, so the invariants
//! hold at every observable point.
//!
//! # Invariants
//!
//! - `0 <= paid_periods <= term`
//! - Settled periods are contiguous from period 1; reversal is only
//!   allowed at the settled frontier so no gap can ever appear
//! - `total_payable` and the installments are fixed at creation and are
//!   never recomputed from later rate edits
//! - Status is `Paid` exactly when every period is settled and no mora is
//!   outstanding, unless an operator override is in force

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ClientId, CollectorId, Frequency, LoanId, Money, PaymentId, Rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationTerms;
use crate::config::{EngineConfig, MoraPolicy, OverpaymentPolicy};
use crate::error::LendingError;
use crate::events::LoanEvent;
use crate::payment::Payment;
use crate::schedule::{generate_schedule, reanchor_schedule, ScheduleEntry};
use crate::status::{derive_status, LoanStatus, StatusOverride};

/// What a period costs to settle at a given payment date
struct PeriodAssessment {
    on_time: bool,
    /// Total mora owed for the period, including earlier charges
    mora_due_total: Money,
    /// Portion of `mora_due_total` not yet charged by earlier payments
    newly_charged: Money,
    /// Amount still needed to settle the period
    required: Money,
}

/// The Loan aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan identifier
    id: LoanId,
    /// Borrower
    client_id: ClientId,
    /// Collector responsible for the route, if assigned
    collector_id: Option<CollectorId>,
    /// Original amount lent
    principal: Money,
    /// Flat interest rate over the full term
    interest_rate: Rate,
    /// Late-fee (mora) rate applied to a missed installment
    mora_rate: Rate,
    /// Number of collection periods
    term: u32,
    /// Collection frequency
    frequency: Frequency,
    /// Disbursement date; the first installment falls one period later
    start_date: NaiveDate,
    /// Principal plus flat interest, fixed at creation
    total_payable: Money,
    /// Regular per-period installment, fixed at creation
    installment: Money,
    /// Final-period installment absorbing the rounding remainder
    final_installment: Money,
    /// Settled periods, counted from 1
    paid_periods: u32,
    /// Charged but uncollected mora
    accrued_mora: Money,
    /// Live schedule; settled periods keep historical due dates
    schedule: Vec<ScheduleEntry>,
    /// Payment history, in recording order
    payments: Vec<Payment>,
    /// Current status
    status: LoanStatus,
    /// Operator-forced status, if any
    status_override: Option<StatusOverride>,
    /// Version for optimistic concurrency
    version: u32,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<LoanEvent>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Loan {
    /// Returns the loan ID
    pub fn id(&self) -> LoanId {
        self.id
    }

    /// Returns the borrower ID
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the assigned collector, if any
    pub fn collector_id(&self) -> Option<CollectorId> {
        self.collector_id
    }

    /// Returns the principal
    pub fn principal(&self) -> Money {
        self.principal
    }

    /// Returns the flat interest rate
    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    /// Returns the mora rate
    pub fn mora_rate(&self) -> Rate {
        self.mora_rate
    }

    /// Returns the term in periods
    pub fn term(&self) -> u32 {
        self.term
    }

    /// Returns the collection frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the disbursement date
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the fixed total payable
    pub fn total_payable(&self) -> Money {
        self.total_payable
    }

    /// Returns the regular installment
    pub fn installment(&self) -> Money {
        self.installment
    }

    /// Returns the final-period installment
    pub fn final_installment(&self) -> Money {
        self.final_installment
    }

    /// Returns the number of settled periods
    pub fn paid_periods(&self) -> u32 {
        self.paid_periods
    }

    /// Returns the uncollected mora
    pub fn accrued_mora(&self) -> Money {
        self.accrued_mora
    }

    /// Returns the live schedule
    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    /// Returns the payment history
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Returns the current status
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// Returns the operator override, if one is in force
    pub fn status_override(&self) -> Option<&StatusOverride> {
        self.status_override.as_ref()
    }

    /// Returns the optimistic-concurrency version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-update timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        std::mem::take(&mut self.events)
    }

    /// The next period awaiting settlement, if any
    pub fn next_unpaid_period(&self) -> Option<u32> {
        if self.paid_periods < self.term {
            Some(self.paid_periods + 1)
        } else {
            None
        }
    }

    /// Due date of the next unpaid period
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        self.next_unpaid_period()
            .map(|period| self.schedule_entry(period).due_date)
    }

    /// Finds a payment by its identifier
    pub fn find_payment(&self, payment_id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }

    /// Reconstructs the fixed terms computed at creation
    pub fn terms(&self) -> AmortizationTerms {
        AmortizationTerms {
            principal: self.principal,
            interest_rate: self.interest_rate,
            term: self.term,
            total_payable: self.total_payable,
            installment: self.installment,
            final_installment: self.final_installment,
        }
    }

    /// Status as it would be derived today, without mutating the loan
    ///
    /// An operator override wins; otherwise the status is re-derived from
    /// the collection state. Overdue detection is lazy: there is no sweep
    /// job, the answer is computed at read time.
    pub fn status_as_of(&self, today: NaiveDate) -> LoanStatus {
        if let Some(forced) = &self.status_override {
            return forced.status;
        }
        derive_status(
            self.paid_periods,
            self.term,
            self.accrued_mora,
            today,
            self.next_due_date(),
        )
    }

    /// Applies a payment against the next unpaid period
    ///
    /// The full decision (lateness, mora, partial handling, settlement,
    /// status) happens here and the updated aggregate is the result; the
    /// caller never needs a second read to see the post-payment state.
    ///
    /// # Errors
    ///
    /// - `LoanAlreadyPaid` when no period is left to pay
    /// - `Validation` when the amount is not positive
    /// - `PartialPaymentRequiresConfirmation` when the amount is below the
    ///   required total and `allow_partial` is false; no state changes
    pub fn apply_payment(
        &mut self,
        amount: Money,
        payment_date: NaiveDate,
        allow_partial: bool,
        config: &EngineConfig,
    ) -> Result<Payment, LendingError> {
        if self.status == LoanStatus::Paid {
            return Err(LendingError::LoanAlreadyPaid);
        }
        let Some(period) = self.next_unpaid_period() else {
            return Err(LendingError::LoanAlreadyPaid);
        };
        if !amount.is_positive() {
            return Err(LendingError::validation(
                "amount",
                "payment amount must be greater than zero",
            ));
        }

        let assessment = self.assess_period(period, payment_date, config);
        let settled = amount >= assessment.required;

        if !settled && !allow_partial {
            return Err(LendingError::PartialPaymentRequiresConfirmation {
                required: assessment.required,
                offered: amount,
            });
        }

        self.accrued_mora = self.accrued_mora + assessment.newly_charged;

        let mut payment = Payment {
            id: PaymentId::new_v7(),
            loan_id: self.id,
            period,
            amount,
            payment_date,
            mora_charged: assessment.newly_charged,
            shortfall: if settled {
                Money::zero()
            } else {
                assessment.required - amount
            },
            overpayment: Money::zero(),
            on_time: assessment.on_time,
            settled_period: settled,
            recorded_at: Utc::now(),
        };

        let mut excess = Money::zero();
        if settled {
            self.paid_periods += 1;
            self.accrued_mora = self.accrued_mora.saturating_sub(assessment.mora_due_total);

            let surplus = amount - assessment.required;
            if surplus.is_positive() {
                match config.overpayment {
                    OverpaymentPolicy::RecordExcess => payment.overpayment = surplus,
                    OverpaymentPolicy::RollToNext => {
                        // carry records hold the surplus cash
                        payment.amount = assessment.required;
                        excess = surplus;
                    }
                }
            }
        }

        tracing::info!(
            loan_id = %self.id,
            period,
            amount = %payment.amount,
            settled,
            on_time = assessment.on_time,
            "payment applied"
        );

        self.events.push(LoanEvent::PaymentRecorded {
            loan_id: self.id,
            payment_id: payment.id,
            period,
            amount: payment.amount,
            on_time: payment.on_time,
            settled_period: settled,
            timestamp: payment.recorded_at,
        });
        self.payments.push(payment.clone());

        if excess.is_positive() {
            self.roll_excess_forward(excess, payment_date, config);
        }

        self.finish_mutation(payment_date);
        Ok(payment)
    }

    /// Reverses a recorded payment
    ///
    /// A payment that settled its period can only be reversed while that
    /// period is still the settled frontier; anything else would punch a
    /// gap into the contiguous paid range. Reversing restores the mora
    /// the settlement had collected and rolls back the charge the
    /// payment itself introduced.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` for an unknown or already-reversed payment
    /// - `InvalidOperation` when the payment is not at the frontier
    pub fn reverse_payment(
        &mut self,
        payment_id: PaymentId,
        today: NaiveDate,
    ) -> Result<(), LendingError> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| LendingError::PaymentNotFound(payment_id.to_string()))?;
        let payment = self.payments[index].clone();

        if payment.settled_period {
            if payment.period != self.paid_periods {
                return Err(LendingError::invalid_operation(
                    "only the most recently settled period can be reversed",
                ));
            }
            self.paid_periods -= 1;
            // Mora collected at settlement becomes outstanding again,
            // except the portion this payment itself charged.
            let collected = self.mora_charged_for(payment.period);
            self.accrued_mora =
                self.accrued_mora + collected.saturating_sub(payment.mora_charged);
        } else {
            self.accrued_mora = self.accrued_mora.saturating_sub(payment.mora_charged);
        }

        self.payments.remove(index);

        tracing::info!(
            loan_id = %self.id,
            payment_id = %payment.id,
            period = payment.period,
            "payment reversed"
        );

        self.events.push(LoanEvent::PaymentReversed {
            loan_id: self.id,
            payment_id: payment.id,
            period: payment.period,
            timestamp: Utc::now(),
        });
        self.finish_mutation(today);
        Ok(())
    }

    /// Moves the payment day: re-anchors every unpaid due date
    ///
    /// Settled periods keep their historical due dates; the next unpaid
    /// installment falls one collection step after `new_anchor`.
    pub fn change_payment_day(
        &mut self,
        new_anchor: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), LendingError> {
        let Some(first_moved) = self.next_unpaid_period() else {
            return Err(LendingError::LoanAlreadyPaid);
        };

        let terms = self.terms();
        self.schedule = reanchor_schedule(
            &self.schedule,
            self.paid_periods,
            new_anchor,
            self.frequency,
            &terms,
        );

        self.events.push(LoanEvent::ScheduleReanchored {
            loan_id: self.id,
            new_anchor,
            first_moved_period: first_moved,
            timestamp: Utc::now(),
        });
        self.finish_mutation(today);
        Ok(())
    }

    /// Forces a status as an explicit operator decision
    ///
    /// The override is audited and sticky for reads; the next engine
    /// mutation clears it and re-derives, emitting a status event, so the
    /// automatic derivation never fights the operator silently.
    pub fn override_status(
        &mut self,
        status: LoanStatus,
        actor: impl Into<String>,
        reason: Option<String>,
    ) {
        let now = Utc::now();
        let actor = actor.into();
        let from = self.status;

        self.status = status;
        self.status_override = Some(StatusOverride {
            status,
            actor: actor.clone(),
            reason: reason.clone(),
            overridden_at: now,
        });
        self.events.push(LoanEvent::StatusOverridden {
            loan_id: self.id,
            from,
            to: status,
            actor,
            reason,
            timestamp: now,
        });
        self.version += 1;
        self.updated_at = now;
    }

    /// Removes an operator override and returns to automatic derivation
    pub fn clear_status_override(&mut self, today: NaiveDate) {
        if self.status_override.take().is_some() {
            self.rederive_status(today);
            self.version += 1;
            self.updated_at = Utc::now();
        }
    }

    fn schedule_entry(&self, period: u32) -> ScheduleEntry {
        // Schedule is contiguous 1..=term by construction
        self.schedule[(period - 1) as usize]
    }

    /// Mora already charged for a period by its recorded payments
    fn mora_charged_for(&self, period: u32) -> Money {
        self.payments
            .iter()
            .filter(|p| p.period == period)
            .map(|p| p.mora_charged)
            .sum()
    }

    /// Cash already collected toward an unsettled period
    fn partial_paid_toward(&self, period: u32) -> Money {
        self.payments
            .iter()
            .filter(|p| p.period == period && !p.settled_period)
            .map(|p| p.amount)
            .sum()
    }

    /// Full mora owed for settling `period` on `payment_date`
    fn assess_mora(&self, period: u32, payment_date: NaiveDate, config: &EngineConfig) -> Money {
        let terms = self.terms();
        match config.mora {
            MoraPolicy::FlatPerSettledPeriod => self
                .mora_rate
                .apply(&terms.expected_amount(period))
                .round_cents(),
            MoraPolicy::PerMissedPeriod => self
                .schedule
                .iter()
                .filter(|e| e.period >= period && e.due_date < payment_date)
                .map(|e| self.mora_rate.apply(&e.amount).round_cents())
                .sum(),
        }
    }

    fn assess_period(
        &self,
        period: u32,
        payment_date: NaiveDate,
        config: &EngineConfig,
    ) -> PeriodAssessment {
        let entry = self.schedule_entry(period);
        let on_time = payment_date <= entry.due_date;

        let already_charged = self.mora_charged_for(period);
        let mora_due_total = if on_time {
            already_charged
        } else {
            // An earlier late partial may have charged this period already
            self.assess_mora(period, payment_date, config)
                .max(already_charged)
        };
        let newly_charged = mora_due_total.saturating_sub(already_charged);

        let required = (entry.amount + mora_due_total)
            .saturating_sub(self.partial_paid_toward(period));

        PeriodAssessment {
            on_time,
            mora_due_total,
            newly_charged,
            required,
        }
    }

    /// Applies rolled-over surplus to the following unpaid periods
    fn roll_excess_forward(
        &mut self,
        mut excess: Money,
        payment_date: NaiveDate,
        config: &EngineConfig,
    ) {
        while excess.is_positive() {
            let Some(period) = self.next_unpaid_period() else {
                break;
            };
            let assessment = self.assess_period(period, payment_date, config);
            self.accrued_mora = self.accrued_mora + assessment.newly_charged;

            let settled = excess >= assessment.required;
            let applied = if settled { assessment.required } else { excess };

            let payment = Payment {
                id: PaymentId::new_v7(),
                loan_id: self.id,
                period,
                amount: applied,
                payment_date,
                mora_charged: assessment.newly_charged,
                shortfall: if settled {
                    Money::zero()
                } else {
                    assessment.required - excess
                },
                overpayment: Money::zero(),
                on_time: assessment.on_time,
                settled_period: settled,
                recorded_at: Utc::now(),
            };

            if settled {
                self.paid_periods += 1;
                self.accrued_mora = self.accrued_mora.saturating_sub(assessment.mora_due_total);
            }
            excess = excess.saturating_sub(applied);

            self.events.push(LoanEvent::PaymentRecorded {
                loan_id: self.id,
                payment_id: payment.id,
                period,
                amount: payment.amount,
                on_time: payment.on_time,
                settled_period: settled,
                timestamp: payment.recorded_at,
            });
            self.payments.push(payment);
        }

        // Loan fully settled with surplus left: record it on the last payment
        if excess.is_positive() {
            if let Some(last) = self.payments.last_mut() {
                last.amount = last.amount + excess;
                last.overpayment = last.overpayment + excess;
            }
        }
    }

    fn rederive_status(&mut self, reference: NaiveDate) {
        let next_due = self.next_due_date();
        let new_status = derive_status(
            self.paid_periods,
            self.term,
            self.accrued_mora,
            reference,
            next_due,
        );
        if new_status != self.status {
            self.events.push(LoanEvent::StatusChanged {
                loan_id: self.id,
                from: self.status,
                to: new_status,
                timestamp: Utc::now(),
            });
            self.status = new_status;
        }
    }

    /// Closes out a mutation: clears any override, re-derives status,
    /// bumps the concurrency version
    fn finish_mutation(&mut self, reference: NaiveDate) {
        self.status_override = None;
        self.rederive_status(reference);
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// All persisted fields of a loan, for reconstruction from storage
///
/// Repositories rebuild aggregates through [`Loan::from_stored`]; the
/// engine itself never constructs loans this way.
#[derive(Debug, Clone)]
pub struct StoredLoan {
    pub id: LoanId,
    pub client_id: ClientId,
    pub collector_id: Option<CollectorId>,
    pub principal: Money,
    pub interest_rate: Rate,
    pub mora_rate: Rate,
    pub term: u32,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub total_payable: Money,
    pub installment: Money,
    pub final_installment: Money,
    pub paid_periods: u32,
    pub accrued_mora: Money,
    pub schedule: Vec<ScheduleEntry>,
    pub payments: Vec<Payment>,
    pub status: LoanStatus,
    pub status_override: Option<StatusOverride>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// Rebuilds an aggregate from its stored state
    pub fn from_stored(stored: StoredLoan) -> Self {
        Self {
            id: stored.id,
            client_id: stored.client_id,
            collector_id: stored.collector_id,
            principal: stored.principal,
            interest_rate: stored.interest_rate,
            mora_rate: stored.mora_rate,
            term: stored.term,
            frequency: stored.frequency,
            start_date: stored.start_date,
            total_payable: stored.total_payable,
            installment: stored.installment,
            final_installment: stored.final_installment,
            paid_periods: stored.paid_periods,
            accrued_mora: stored.accrued_mora,
            schedule: stored.schedule,
            payments: stored.payments,
            status: stored.status,
            status_override: stored.status_override,
            version: stored.version,
            events: Vec::new(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Builder for creating new loans
///
/// Creation runs the amortization calculator and the schedule generator
/// in one step, so a loan never exists without its fixed terms and its
/// initial schedule.
///
/// # Example
///
/// ```rust,ignore
/// let loan = LoanBuilder::new()
///     .client(client_id)
///     .principal(Money::new(dec!(1000)))
///     .interest_rate(Rate::from_percent(dec!(20)))
///     .mora_rate(Rate::from_percent(dec!(5)))
///     .term(12)
///     .frequency(Frequency::Weekly)
///     .start_date(date)
///     .build()?;
/// ```
pub struct LoanBuilder {
    client_id: Option<ClientId>,
    collector_id: Option<CollectorId>,
    principal: Option<Money>,
    interest_rate: Option<Rate>,
    mora_rate: Rate,
    term: Option<u32>,
    frequency: Frequency,
    start_date: Option<NaiveDate>,
}

impl LoanBuilder {
    /// Creates a new loan builder with default values
    pub fn new() -> Self {
        Self {
            client_id: None,
            collector_id: None,
            principal: None,
            interest_rate: None,
            mora_rate: Rate::from_percent(Decimal::ZERO),
            term: None,
            frequency: Frequency::Weekly,
            start_date: None,
        }
    }

    /// Sets the borrower
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Assigns a collector
    pub fn collector(mut self, collector_id: CollectorId) -> Self {
        self.collector_id = Some(collector_id);
        self
    }

    /// Sets the principal
    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Sets the flat interest rate
    pub fn interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    /// Sets the mora rate
    pub fn mora_rate(mut self, rate: Rate) -> Self {
        self.mora_rate = rate;
        self
    }

    /// Sets the term in periods
    pub fn term(mut self, term: u32) -> Self {
        self.term = Some(term);
        self
    }

    /// Sets the collection frequency
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the disbursement date
    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Builds the loan
    ///
    /// # Errors
    ///
    /// Returns a validation error when a required field is missing, the
    /// amortization inputs are out of range, or the mora rate is invalid.
    pub fn build(self) -> Result<Loan, LendingError> {
        let client_id = self
            .client_id
            .ok_or_else(|| LendingError::validation("client_id", "client is required"))?;
        let principal = self
            .principal
            .ok_or_else(|| LendingError::validation("principal", "principal is required"))?;
        let interest_rate = self
            .interest_rate
            .ok_or_else(|| LendingError::validation("interest_rate", "interest rate is required"))?;
        let term = self
            .term
            .ok_or_else(|| LendingError::validation("term", "term is required"))?;
        let start_date = self
            .start_date
            .ok_or_else(|| LendingError::validation("start_date", "start date is required"))?;

        if self.mora_rate.as_percent() < Decimal::ZERO {
            return Err(LendingError::validation(
                "mora_rate",
                "mora rate cannot be negative",
            ));
        }
        if self.mora_rate.as_percent() > Decimal::ONE_HUNDRED {
            return Err(LendingError::validation(
                "mora_rate",
                "mora rate cannot exceed 100 percent",
            ));
        }

        let terms = AmortizationTerms::compute(principal, interest_rate, term)?;
        let schedule = generate_schedule(start_date, self.frequency, &terms);

        let now = Utc::now();
        let loan_id = LoanId::new_v7();

        Ok(Loan {
            id: loan_id,
            client_id,
            collector_id: self.collector_id,
            principal,
            interest_rate,
            mora_rate: self.mora_rate,
            term,
            frequency: self.frequency,
            start_date,
            total_payable: terms.total_payable,
            installment: terms.installment,
            final_installment: terms.final_installment,
            paid_periods: 0,
            accrued_mora: Money::zero(),
            schedule,
            payments: Vec::new(),
            status: LoanStatus::Active,
            status_override: None,
            version: 1,
            events: vec![LoanEvent::LoanCreated {
                loan_id,
                principal,
                total_payable: terms.total_payable,
                term,
                timestamp: now,
            }],
            created_at: now,
            updated_at: now,
        })
    }
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_loan() -> Loan {
        LoanBuilder::new()
            .client(ClientId::new())
            .principal(Money::new(dec!(1000)))
            .interest_rate(Rate::from_percent(dec!(20)))
            .mora_rate(Rate::from_percent(dec!(5)))
            .term(12)
            .frequency(Frequency::Weekly)
            .start_date(date(2024, 1, 1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_creation_fixes_terms_and_schedule() {
        let loan = weekly_loan();

        assert_eq!(loan.total_payable().amount(), dec!(1200.00));
        assert_eq!(loan.installment().amount(), dec!(100.00));
        assert_eq!(loan.schedule().len(), 12);
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.paid_periods(), 0);
    }

    #[test]
    fn test_builder_requires_client() {
        let err = LoanBuilder::new()
            .principal(Money::new(dec!(1000)))
            .interest_rate(Rate::from_percent(dec!(20)))
            .term(12)
            .start_date(date(2024, 1, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, LendingError::Validation { field, .. } if field == "client_id"));
    }

    #[test]
    fn test_on_time_full_payment_settles_period() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        // Due 2024-01-08; paid on the due date
        let payment = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        assert_eq!(loan.paid_periods(), 1);
        assert!(payment.on_time);
        assert!(payment.settled_period);
        assert_eq!(payment.mora_charged, Money::zero());
        assert_eq!(loan.accrued_mora(), Money::zero());
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn test_late_payment_charges_flat_mora() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        // Three days after the 2024-01-08 due date; 5% of 100 = 5.00
        let payment = loan
            .apply_payment(Money::new(dec!(105)), date(2024, 1, 11), false, &config)
            .unwrap();

        assert!(!payment.on_time);
        assert_eq!(payment.mora_charged.amount(), dec!(5.00));
        assert!(payment.settled_period);
        assert_eq!(loan.paid_periods(), 1);
        assert_eq!(loan.accrued_mora(), Money::zero());
    }

    #[test]
    fn test_unconfirmed_partial_is_rejected_without_state_change() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let err = loan
            .apply_payment(Money::new(dec!(60)), date(2024, 1, 8), false, &config)
            .unwrap_err();

        assert!(matches!(
            err,
            LendingError::PartialPaymentRequiresConfirmation { required, offered }
                if required.amount() == dec!(100) && offered.amount() == dec!(60)
        ));
        assert_eq!(loan.paid_periods(), 0);
        assert!(loan.payments().is_empty());
        assert_eq!(loan.version(), 1);
    }

    #[test]
    fn test_confirmed_partial_records_shortfall() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let payment = loan
            .apply_payment(Money::new(dec!(60)), date(2024, 1, 8), true, &config)
            .unwrap();

        assert_eq!(payment.shortfall.amount(), dec!(40));
        assert!(!payment.settled_period);
        assert_eq!(loan.paid_periods(), 0);
    }

    #[test]
    fn test_partials_accumulate_to_settlement() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(60)), date(2024, 1, 8), true, &config)
            .unwrap();
        let second = loan
            .apply_payment(Money::new(dec!(40)), date(2024, 1, 8), true, &config)
            .unwrap();

        assert!(second.settled_period);
        assert_eq!(second.period, 1);
        assert_eq!(loan.paid_periods(), 1);
    }

    #[test]
    fn test_shortfall_never_negative() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let payment = loan
            .apply_payment(Money::new(dec!(99.99)), date(2024, 1, 8), true, &config)
            .unwrap();

        assert_eq!(payment.shortfall.amount(), dec!(0.01));
        assert!(!payment.shortfall.is_negative());
    }

    #[test]
    fn test_overpayment_recorded_by_default() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let payment = loan
            .apply_payment(Money::new(dec!(150)), date(2024, 1, 8), false, &config)
            .unwrap();

        assert_eq!(payment.overpayment.amount(), dec!(50));
        assert_eq!(loan.paid_periods(), 1);
    }

    #[test]
    fn test_overpayment_rolls_forward_when_configured() {
        let mut loan = weekly_loan();
        let config = EngineConfig {
            overpayment: OverpaymentPolicy::RollToNext,
            ..EngineConfig::default()
        };

        loan.apply_payment(Money::new(dec!(250)), date(2024, 1, 8), false, &config)
            .unwrap();

        // 100 settles period 1, 100 settles period 2, 50 partial on period 3
        assert_eq!(loan.paid_periods(), 2);
        assert_eq!(loan.payments().len(), 3);
        let partial = &loan.payments()[2];
        assert_eq!(partial.period, 3);
        assert_eq!(partial.amount.amount(), dec!(50));
        assert_eq!(partial.shortfall.amount(), dec!(50));
    }

    #[test]
    fn test_payment_against_paid_loan_is_rejected() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        for k in 0..12 {
            let pay_date = date(2024, 1, 8) + chrono::Duration::weeks(k);
            loan.apply_payment(Money::new(dec!(100)), pay_date, false, &config)
                .unwrap();
        }
        assert_eq!(loan.status(), LoanStatus::Paid);

        let err = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 4, 1), false, &config)
            .unwrap_err();
        assert!(matches!(err, LendingError::LoanAlreadyPaid));
    }

    #[test]
    fn test_reverse_restores_pre_payment_state() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let before = (
            loan.paid_periods(),
            loan.accrued_mora(),
            loan.status(),
            loan.payments().len(),
        );

        let payment = loan
            .apply_payment(Money::new(dec!(105)), date(2024, 1, 11), false, &config)
            .unwrap();
        loan.reverse_payment(payment.id, date(2024, 1, 11)).unwrap();

        let after = (
            loan.paid_periods(),
            loan.accrued_mora(),
            loan.status(),
            loan.payments().len(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_reverse_settling_payment_restores_partial_mora() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        // Late partial charges 5.00 of mora
        loan.apply_payment(Money::new(dec!(60)), date(2024, 1, 11), true, &config)
            .unwrap();
        assert_eq!(loan.accrued_mora().amount(), dec!(5.00));

        // Settling payment collects the remaining 45.00 (40 + 5 mora)
        let settle = loan
            .apply_payment(Money::new(dec!(45)), date(2024, 1, 12), true, &config)
            .unwrap();
        assert_eq!(loan.paid_periods(), 1);
        assert_eq!(loan.accrued_mora(), Money::zero());

        loan.reverse_payment(settle.id, date(2024, 1, 12)).unwrap();
        assert_eq!(loan.paid_periods(), 0);
        assert_eq!(loan.accrued_mora().amount(), dec!(5.00));
    }

    #[test]
    fn test_reverse_unknown_payment_fails() {
        let mut loan = weekly_loan();

        let err = loan
            .reverse_payment(PaymentId::new_v7(), date(2024, 1, 8))
            .unwrap_err();
        assert!(matches!(err, LendingError::PaymentNotFound(_)));
    }

    #[test]
    fn test_reverse_behind_frontier_is_rejected() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        let first = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 15), false, &config)
            .unwrap();

        let err = loan.reverse_payment(first.id, date(2024, 1, 15)).unwrap_err();
        assert!(matches!(err, LendingError::InvalidOperation(_)));
    }

    #[test]
    fn test_change_payment_day_preserves_paid_periods() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        let paid_due = loan.schedule()[0].due_date;

        loan.change_payment_day(date(2024, 2, 1), date(2024, 1, 10))
            .unwrap();

        assert_eq!(loan.schedule()[0].due_date, paid_due);
        assert_eq!(loan.schedule()[1].due_date, date(2024, 2, 8));
        assert_eq!(loan.next_due_date(), Some(date(2024, 2, 8)));
    }

    #[test]
    fn test_override_is_sticky_until_next_mutation() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        loan.override_status(LoanStatus::Overdue, "supervisor", Some("field report".into()));
        assert_eq!(loan.status(), LoanStatus::Overdue);
        assert_eq!(loan.status_as_of(date(2024, 1, 2)), LoanStatus::Overdue);
        assert!(loan.status_override().is_some());

        // The next mutation clears the override and re-derives
        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();
        assert!(loan.status_override().is_none());
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn test_override_paid_blocks_payments() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        loan.override_status(LoanStatus::Paid, "supervisor", None);
        let err = loan
            .apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap_err();
        assert!(matches!(err, LendingError::LoanAlreadyPaid));
    }

    #[test]
    fn test_per_missed_period_mora_accumulates() {
        let mut loan = weekly_loan();
        let config = EngineConfig {
            mora: MoraPolicy::PerMissedPeriod,
            ..EngineConfig::default()
        };

        // Periods 1 and 2 (due Jan 8 and Jan 15) are both overdue on Jan 20
        let payment = loan
            .apply_payment(Money::new(dec!(110)), date(2024, 1, 20), false, &config)
            .unwrap();

        assert_eq!(payment.mora_charged.amount(), dec!(10.00));
        assert!(payment.settled_period);
        // Period 2 is still past due, so the loan stays overdue
        assert_eq!(loan.status(), LoanStatus::Overdue);
    }

    #[test]
    fn test_events_are_drained_once() {
        let mut loan = weekly_loan();
        let config = EngineConfig::default();

        loan.apply_payment(Money::new(dec!(100)), date(2024, 1, 8), false, &config)
            .unwrap();

        let events = loan.take_events();
        assert!(events.iter().any(|e| e.event_type() == "LoanCreated"));
        assert!(events.iter().any(|e| e.event_type() == "PaymentRecorded"));
        assert!(loan.take_events().is_empty());
    }
}
