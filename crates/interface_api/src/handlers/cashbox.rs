//! Cash register handlers

use axum::{
    extract::{Query, State},
    Json,
};

use core_kernel::{CollectorId, LoanId, Money};
use domain_cashbox::{CashEntry, EntryDirection};
use infra_db::CashboxRepository;

use crate::dto::cashbox::*;
use crate::error::ApiError;
use crate::AppState;

/// Records a register row
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let direction = match request.direction.as_str() {
        "INCOME" => EntryDirection::Income,
        "EXPENSE" => EntryDirection::Expense,
        other => {
            return Err(ApiError::Validation(format!(
                "unknown direction: {other}"
            )))
        }
    };

    let mut entry = CashEntry::new(
        request.entry_date,
        direction,
        request.concept,
        Money::new(request.amount),
    )?;
    if let Some(loan_id) = request.loan_id {
        entry = entry.with_loan(LoanId::from(loan_id));
    }
    if let Some(collector_id) = request.collector_id {
        entry = entry.with_collector(CollectorId::from(collector_id));
    }

    CashboxRepository::new(state.pool.clone()).insert(&entry).await?;
    Ok(Json(EntryResponse::from_entry(&entry)))
}

/// Lists the register rows for a business day
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = CashboxRepository::new(state.pool.clone())
        .entries_for(query.date)
        .await?;
    Ok(Json(entries.iter().map(EntryResponse::from_entry).collect()))
}

/// Builds the daily close summary for a business day
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DailySummaryResponse>, ApiError> {
    let register = CashboxRepository::new(state.pool.clone())
        .load_register()
        .await?;
    let summary = register.daily_summary(query.date);
    Ok(Json(DailySummaryResponse::from_summary(&summary)))
}
