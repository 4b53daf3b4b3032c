//! HTTP API Layer
//!
//! This crate provides the REST API for the lending back office using
//! Axum. Authentication and session handling live in the gateway in
//! front of this service; here every request is already trusted.
//!
//! # Architecture
//!
//! - **Handlers**: load → engine operation → compare-and-swap save →
//!   full updated aggregate back to the client
//! - **Middleware**: request auditing and tracing
//! - **DTOs**: decimal-safe strings for money, `YYYY-MM-DD` for dates
//! - **Error Handling**: the engine's error taxonomy mapped to HTTP
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config)?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::Timezone;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers::{cashbox, health, loans, party};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
    pub timezone: Timezone,
}

/// Creates the main API router
///
/// # Errors
///
/// Fails when the configured timezone is not a valid IANA name
pub fn create_router(pool: PgPool, config: ApiConfig) -> Result<Router, ApiError> {
    let timezone = Timezone::parse(&config.timezone)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let state = AppState {
        pool,
        config,
        timezone,
    };

    // Public routes (no gateway auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Loan routes: the engine surface
    let loan_routes = Router::new()
        .route("/preview", post(loans::preview))
        .route("/", post(loans::create_loan))
        .route("/", get(loans::list_loans))
        .route("/:id", get(loans::get_loan))
        .route("/:id", delete(loans::delete_loan))
        .route("/:id/payments", post(loans::create_payment))
        .route("/:id/payments/:payment_id", delete(loans::delete_payment))
        .route("/:id/reschedule", post(loans::change_payment_day))
        .route("/:id/status", put(loans::update_status));

    // Client routes
    let client_routes = Router::new()
        .route("/", post(party::create_client))
        .route("/", get(party::list_clients))
        .route("/:id", get(party::get_client))
        .route("/:id", put(party::update_client));

    // Collector routes
    let collector_routes = Router::new()
        .route("/", post(party::create_collector))
        .route("/", get(party::list_collectors))
        .route("/:id", get(party::get_collector));

    // Cash register routes
    let cashbox_routes = Router::new()
        .route("/entries", post(cashbox::create_entry))
        .route("/entries", get(cashbox::list_entries))
        .route("/summary", get(cashbox::daily_summary));

    let api_routes = Router::new()
        .nest("/loans", loan_routes)
        .nest("/clients", client_routes)
        .nest("/collectors", collector_routes)
        .nest("/cashbox", cashbox_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    Ok(Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state))
}
