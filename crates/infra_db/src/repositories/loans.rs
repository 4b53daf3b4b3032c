//! Loan repository
//!
//! Persists the loan aggregate: the loan row itself, its payment rows,
//! and the schedule, stored as a JSON document on the loan row since it
//! is derived data and never gets its own table.
//!
//! Every mutation goes through [`LoanRepository::save`], which performs a
//! version compare-and-swap inside a transaction. Two concurrent writers
//! can both read the same aggregate, but only the first save wins; the
//! second gets `DatabaseError::ConcurrentModification` and retries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{ClientId, CollectorId, Frequency, LoanId, Money, PaymentId, Rate};
use domain_lending::{
    DeletePolicy, Loan, LoanStatus, Payment, ScheduleEntry, StatusOverride, StoredLoan,
};

use crate::error::DatabaseError;

/// Repository for loan aggregates
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct LoanRow {
    id: Uuid,
    client_id: Uuid,
    collector_id: Option<Uuid>,
    principal: Decimal,
    interest_rate_percent: Decimal,
    mora_rate_percent: Decimal,
    term: i32,
    frequency: String,
    start_date: NaiveDate,
    total_payable: Decimal,
    installment: Decimal,
    final_installment: Decimal,
    paid_periods: i32,
    accrued_mora: Decimal,
    schedule: String,
    status: String,
    status_override: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: Uuid,
    loan_id: Uuid,
    period: i32,
    amount: Decimal,
    payment_date: NaiveDate,
    mora_charged: Decimal,
    shortfall: Decimal,
    overpayment: Decimal,
    on_time: bool,
    settled_period: bool,
    recorded_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Payment {
        Payment {
            id: PaymentId::from(self.id),
            loan_id: LoanId::from(self.loan_id),
            period: self.period as u32,
            amount: Money::new(self.amount),
            payment_date: self.payment_date,
            mora_charged: Money::new(self.mora_charged),
            shortfall: Money::new(self.shortfall),
            overpayment: Money::new(self.overpayment),
            on_time: self.on_time,
            settled_period: self.settled_period,
            recorded_at: self.recorded_at,
        }
    }
}

impl LoanRow {
    fn into_loan(self, payments: Vec<Payment>) -> Result<Loan, DatabaseError> {
        let frequency: Frequency = self
            .frequency
            .parse()
            .map_err(DatabaseError::corrupt)?;
        let status: LoanStatus = self.status.parse().map_err(DatabaseError::corrupt)?;
        let schedule: Vec<ScheduleEntry> =
            serde_json::from_str(&self.schedule).map_err(DatabaseError::corrupt)?;
        let status_override: Option<StatusOverride> = self
            .status_override
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(DatabaseError::corrupt)?;

        Ok(Loan::from_stored(StoredLoan {
            id: LoanId::from(self.id),
            client_id: ClientId::from(self.client_id),
            collector_id: self.collector_id.map(CollectorId::from),
            principal: Money::new(self.principal),
            interest_rate: Rate::from_percent(self.interest_rate_percent),
            mora_rate: Rate::from_percent(self.mora_rate_percent),
            term: self.term as u32,
            frequency,
            start_date: self.start_date,
            total_payable: Money::new(self.total_payable),
            installment: Money::new(self.installment),
            final_installment: Money::new(self.final_installment),
            paid_periods: self.paid_periods as u32,
            accrued_mora: Money::new(self.accrued_mora),
            schedule,
            payments,
            status,
            status_override,
            version: self.version as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

const LOAN_COLUMNS: &str = "id, client_id, collector_id, principal, interest_rate_percent, \
     mora_rate_percent, term, frequency, start_date, total_payable, installment, \
     final_installment, paid_periods, accrued_mora, schedule, status, status_override, \
     version, created_at, updated_at";

impl LoanRepository {
    /// Creates a new LoanRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a freshly built loan aggregate
    pub async fn create(&self, loan: &Loan) -> Result<(), DatabaseError> {
        let schedule = serde_json::to_string(loan.schedule()).map_err(DatabaseError::corrupt)?;

        sqlx::query(
            r#"
            INSERT INTO loans (
                id, client_id, collector_id, principal, interest_rate_percent,
                mora_rate_percent, term, frequency, start_date, total_payable,
                installment, final_installment, paid_periods, accrued_mora,
                schedule, status, status_override, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(Uuid::from(loan.id()))
        .bind(Uuid::from(loan.client_id()))
        .bind(loan.collector_id().map(Uuid::from))
        .bind(loan.principal().amount())
        .bind(loan.interest_rate().as_percent())
        .bind(loan.mora_rate().as_percent())
        .bind(loan.term() as i32)
        .bind(loan.frequency().as_str())
        .bind(loan.start_date())
        .bind(loan.total_payable().amount())
        .bind(loan.installment().amount())
        .bind(loan.final_installment().amount())
        .bind(loan.paid_periods() as i32)
        .bind(loan.accrued_mora().amount())
        .bind(schedule)
        .bind(loan.status().as_str())
        .bind(Option::<String>::None)
        .bind(loan.version() as i32)
        .bind(loan.created_at())
        .bind(loan.updated_at())
        .execute(&self.pool)
        .await?;

        tracing::info!(loan_id = %loan.id(), "loan created");
        Ok(())
    }

    /// Loads a loan aggregate with its payment history
    pub async fn find(&self, id: LoanId) -> Result<Loan, DatabaseError> {
        let row: Option<LoanRow> = sqlx::query_as(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| DatabaseError::not_found("Loan", id))?;
        let payments = self.payments_for(id).await?;
        row.into_loan(payments)
    }

    /// Loads every loan for a client
    pub async fn list_by_client(&self, client_id: ClientId) -> Result<Vec<Loan>, DatabaseError> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE client_id = $1 ORDER BY created_at"
        ))
        .bind(Uuid::from(client_id))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Loads all loan aggregates
    pub async fn list(&self) -> Result<Vec<Loan>, DatabaseError> {
        let rows: Vec<LoanRow> = sqlx::query_as(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Persists a mutated aggregate with a version compare-and-swap
    ///
    /// `expected_version` is the version the caller loaded; the UPDATE
    /// only matches while the row still carries it. The loan row and the
    /// payment rows change in one transaction, so no reader ever observes
    /// a payment without its loan-side effects.
    ///
    /// # Errors
    ///
    /// `ConcurrentModification` when the row moved on under the caller;
    /// the whole operation (reload, re-apply, save) should be retried.
    pub async fn save(&self, loan: &Loan, expected_version: u32) -> Result<(), DatabaseError> {
        let schedule = serde_json::to_string(loan.schedule()).map_err(DatabaseError::corrupt)?;
        let status_override = loan
            .status_override()
            .map(serde_json::to_string)
            .transpose()
            .map_err(DatabaseError::corrupt)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE loans
            SET paid_periods = $1, accrued_mora = $2, schedule = $3, status = $4,
                status_override = $5, version = $6, updated_at = $7
            WHERE id = $8 AND version = $9
            "#,
        )
        .bind(loan.paid_periods() as i32)
        .bind(loan.accrued_mora().amount())
        .bind(schedule)
        .bind(loan.status().as_str())
        .bind(status_override)
        .bind(loan.version() as i32)
        .bind(loan.updated_at())
        .bind(Uuid::from(loan.id()))
        .bind(expected_version as i32)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::concurrent("Loan", loan.id()));
        }

        // Payment rows mirror the aggregate exactly; reversals delete rows
        sqlx::query("DELETE FROM payments WHERE loan_id = $1")
            .bind(Uuid::from(loan.id()))
            .execute(&mut *tx)
            .await?;

        for payment in loan.payments() {
            sqlx::query(
                r#"
                INSERT INTO payments (
                    id, loan_id, period, amount, payment_date, mora_charged,
                    shortfall, overpayment, on_time, settled_period, recorded_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(Uuid::from(payment.id))
            .bind(Uuid::from(payment.loan_id))
            .bind(payment.period as i32)
            .bind(payment.amount.amount())
            .bind(payment.payment_date)
            .bind(payment.mora_charged.amount())
            .bind(payment.shortfall.amount())
            .bind(payment.overpayment.amount())
            .bind(payment.on_time)
            .bind(payment.settled_period)
            .bind(payment.recorded_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(loan_id = %loan.id(), version = loan.version(), "loan saved");
        Ok(())
    }

    /// Deletes a loan, honoring the configured delete policy
    pub async fn delete(&self, id: LoanId, policy: DeletePolicy) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let payment_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE loan_id = $1")
                .bind(Uuid::from(id))
                .fetch_one(&mut *tx)
                .await?;

        if payment_count > 0 && policy == DeletePolicy::Reject {
            return Err(DatabaseError::ConstraintViolation(
                "loan has recorded payments".to_string(),
            ));
        }

        sqlx::query("DELETE FROM payments WHERE loan_id = $1")
            .bind(Uuid::from(id))
            .execute(&mut *tx)
            .await?;

        // Register rows survive the loan; they just lose the reference
        sqlx::query("UPDATE cash_entries SET loan_id = NULL WHERE loan_id = $1")
            .bind(Uuid::from(id))
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Loan", id));
        }

        tx.commit().await?;
        tracing::info!(loan_id = %id, "loan deleted");
        Ok(())
    }

    async fn payments_for(&self, loan_id: LoanId) -> Result<Vec<Payment>, DatabaseError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, loan_id, period, amount, payment_date, mora_charged,
                   shortfall, overpayment, on_time, settled_period, recorded_at
            FROM payments
            WHERE loan_id = $1
            ORDER BY recorded_at
            "#,
        )
        .bind(Uuid::from(loan_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaymentRow::into_payment).collect())
    }

    async fn hydrate(&self, rows: Vec<LoanRow>) -> Result<Vec<Loan>, DatabaseError> {
        let mut loans = Vec::with_capacity(rows.len());
        for row in rows {
            let payments = self.payments_for(LoanId::from(row.id)).await?;
            loans.push(row.into_loan(payments)?);
        }
        Ok(loans)
    }
}
