//! Cash register repository

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{CashEntryId, CollectorId, LoanId, Money};
use domain_cashbox::{CashEntry, CashRegister, EntryDirection};

use crate::error::DatabaseError;

/// Repository for cash register rows
#[derive(Debug, Clone)]
pub struct CashboxRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CashEntryRow {
    id: Uuid,
    entry_date: NaiveDate,
    direction: String,
    concept: String,
    amount: Decimal,
    loan_id: Option<Uuid>,
    collector_id: Option<Uuid>,
    recorded_at: DateTime<Utc>,
}

impl CashEntryRow {
    fn into_entry(self) -> Result<CashEntry, DatabaseError> {
        let direction = match self.direction.as_str() {
            "INCOME" => EntryDirection::Income,
            "EXPENSE" => EntryDirection::Expense,
            other => {
                return Err(DatabaseError::corrupt(format!(
                    "unknown cash entry direction: {other}"
                )))
            }
        };

        Ok(CashEntry {
            id: CashEntryId::from(self.id),
            entry_date: self.entry_date,
            direction,
            concept: self.concept,
            amount: Money::new(self.amount),
            loan_id: self.loan_id.map(LoanId::from),
            collector_id: self.collector_id.map(CollectorId::from),
            recorded_at: self.recorded_at,
        })
    }
}

fn direction_str(direction: EntryDirection) -> &'static str {
    match direction {
        EntryDirection::Income => "INCOME",
        EntryDirection::Expense => "EXPENSE",
    }
}

impl CashboxRepository {
    /// Creates a new CashboxRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a register row
    pub async fn insert(&self, entry: &CashEntry) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO cash_entries (id, entry_date, direction, concept, amount,
                                      loan_id, collector_id, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(entry.id))
        .bind(entry.entry_date)
        .bind(direction_str(entry.direction))
        .bind(&entry.concept)
        .bind(entry.amount.amount())
        .bind(entry.loan_id.map(Uuid::from))
        .bind(entry.collector_id.map(Uuid::from))
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Loads the rows for one business day
    pub async fn entries_for(&self, date: NaiveDate) -> Result<Vec<CashEntry>, DatabaseError> {
        let rows: Vec<CashEntryRow> = sqlx::query_as(
            "SELECT id, entry_date, direction, concept, amount, loan_id, collector_id, recorded_at \
             FROM cash_entries WHERE entry_date = $1 ORDER BY recorded_at",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CashEntryRow::into_entry).collect()
    }

    /// Loads the whole register into its domain read model
    pub async fn load_register(&self) -> Result<CashRegister, DatabaseError> {
        let rows: Vec<CashEntryRow> = sqlx::query_as(
            "SELECT id, entry_date, direction, concept, amount, loan_id, collector_id, recorded_at \
             FROM cash_entries ORDER BY entry_date, recorded_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(CashEntryRow::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CashRegister::from_entries(entries))
    }
}
