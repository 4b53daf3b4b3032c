//! Loan handlers
//!
//! Every mutation follows the same shape: load the aggregate, remember
//! its version, run the engine operation, save with a compare-and-swap,
//! and return the full updated aggregate. The client never needs to
//! reload after a mutation.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::{ClientId, CollectorId, Frequency, LoanId, Money, PaymentId, Rate};
use domain_lending::{AmortizationTerms, Loan, LoanBuilder, LoanStatus};
use infra_db::LoanRepository;

use crate::dto::loans::*;
use crate::error::ApiError;
use crate::AppState;

fn log_events(loan: &mut Loan) {
    for event in loan.take_events() {
        tracing::info!(
            loan_id = %event.loan_id(),
            event = event.event_type(),
            timestamp = %event.timestamp(),
            "loan event"
        );
    }
}

/// Computes an amortization preview without persisting anything
pub async fn preview(
    State(_state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let terms = AmortizationTerms::compute(
        Money::new(request.principal),
        Rate::from_percent(request.interest_rate_percent),
        request.term,
    )?;

    Ok(Json(PreviewResponse {
        total_payable: terms.total_payable.amount(),
        installment: terms.installment.amount(),
        final_installment: terms.final_installment.amount(),
    }))
}

/// Creates a loan: amortization terms and initial schedule in one step
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let frequency: Frequency = request
        .frequency
        .parse()
        .map_err(|e: core_kernel::TemporalError| ApiError::Validation(e.to_string()))?;

    let mut builder = LoanBuilder::new()
        .client(ClientId::from(request.client_id))
        .principal(Money::new(request.principal))
        .interest_rate(Rate::from_percent(request.interest_rate_percent))
        .mora_rate(Rate::from_percent(request.mora_rate_percent))
        .term(request.term)
        .frequency(frequency)
        .start_date(request.start_date);
    if let Some(collector_id) = request.collector_id {
        builder = builder.collector(CollectorId::from(collector_id));
    }

    let mut loan = builder.build()?;
    LoanRepository::new(state.pool.clone()).create(&loan).await?;
    log_events(&mut loan);

    Ok(Json(LoanResponse::from_loan(&loan, state.timezone.today())))
}

/// Lists all loans with their derived state
pub async fn list_loans(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = LoanRepository::new(state.pool.clone()).list().await?;
    let today = state.timezone.today();

    Ok(Json(
        loans.iter().map(|loan| LoanResponse::from_loan(loan, today)).collect(),
    ))
}

/// Gets a loan aggregate by ID
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = LoanRepository::new(state.pool.clone())
        .find(LoanId::from(id))
        .await?;

    Ok(Json(LoanResponse::from_loan(&loan, state.timezone.today())))
}

/// Applies a payment against the next unpaid period
pub async fn create_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let repo = LoanRepository::new(state.pool.clone());
    let mut loan = repo.find(LoanId::from(id)).await?;
    let expected_version = loan.version();

    loan.apply_payment(
        Money::new(request.amount),
        request.payment_date,
        request.allow_partial,
        &state.config.engine,
    )?;

    repo.save(&loan, expected_version).await?;
    log_events(&mut loan);

    Ok(Json(LoanResponse::from_loan(&loan, state.timezone.today())))
}

/// Reverses a recorded payment
pub async fn delete_payment(
    State(state): State<AppState>,
    Path((id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LoanResponse>, ApiError> {
    let repo = LoanRepository::new(state.pool.clone());
    let mut loan = repo.find(LoanId::from(id)).await?;
    let expected_version = loan.version();
    let today = state.timezone.today();

    loan.reverse_payment(PaymentId::from(payment_id), today)?;

    repo.save(&loan, expected_version).await?;
    log_events(&mut loan);

    Ok(Json(LoanResponse::from_loan(&loan, today)))
}

/// Changes the payment day: re-anchors all unpaid due dates
pub async fn change_payment_day(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangePaymentDayRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let repo = LoanRepository::new(state.pool.clone());
    let mut loan = repo.find(LoanId::from(id)).await?;
    let expected_version = loan.version();
    let today = state.timezone.today();

    loan.change_payment_day(request.new_anchor, today)?;

    repo.save(&loan, expected_version).await?;
    log_events(&mut loan);

    Ok(Json(LoanResponse::from_loan(&loan, today)))
}

/// Forces or clears an operator status override
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let repo = LoanRepository::new(state.pool.clone());
    let mut loan = repo.find(LoanId::from(id)).await?;
    let expected_version = loan.version();
    let today = state.timezone.today();

    match &request.status {
        Some(status) => {
            let status: LoanStatus = status.parse().map_err(ApiError::from)?;
            loan.override_status(status, request.actor.clone(), request.reason.clone());
        }
        None => loan.clear_status_override(today),
    }

    repo.save(&loan, expected_version).await?;
    log_events(&mut loan);

    Ok(Json(LoanResponse::from_loan(&loan, today)))
}

/// Deletes a loan, honoring the configured delete policy
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    LoanRepository::new(state.pool.clone())
        .delete(LoanId::from(id), state.config.engine.on_delete_with_payments)
        .await?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}
