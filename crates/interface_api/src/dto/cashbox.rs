//! Cash register DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_cashbox::{CashEntry, DailySummary};

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub entry_date: NaiveDate,
    /// INCOME | EXPENSE
    pub direction: String,
    pub concept: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub loan_id: Option<Uuid>,
    pub collector_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub direction: String,
    pub concept: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub loan_id: Option<Uuid>,
    pub collector_id: Option<Uuid>,
}

impl EntryResponse {
    pub fn from_entry(entry: &CashEntry) -> Self {
        Self {
            id: entry.id.into(),
            entry_date: entry.entry_date,
            direction: format!("{:?}", entry.direction).to_uppercase(),
            concept: entry.concept.clone(),
            amount: entry.amount.amount(),
            loan_id: entry.loan_id.map(Into::into),
            collector_id: entry.collector_id.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub opening: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub closing: Decimal,
}

impl DailySummaryResponse {
    pub fn from_summary(summary: &DailySummary) -> Self {
        Self {
            date: summary.date,
            opening: summary.opening.amount(),
            income: summary.income.amount(),
            expense: summary.expense.amount(),
            closing: summary.closing.amount(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub date: NaiveDate,
}
