//! Loan routes: `/v1/loan/*`
//!
//! Publishes the calculator's rate parameters and term schedule, and runs
//! the calculator against the stored rates.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use aurum_core::quote::validate_amount;
use aurum_core::{LoanQuote, QuoteRequest, calculate_loan_amount, calculate_repayment_amount};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::admin_middleware;
use crate::state::AppState;

/// Build the `/v1/loan` router.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/params/{key}", put(set_param))
        .route_layer(axum_mw::from_fn_with_state(state, admin_middleware));

    Router::new()
        .route("/params", get(get_params))
        .route("/terms", get(get_terms))
        .route("/amount", post(loan_amount))
        .route("/repayment", post(repayment_amount))
        .route("/quote", post(quote))
        .merge(admin)
}

// ── Request / Response types ─────────────────────────────────────────

/// Request body for `PUT /v1/loan/params/{key}`.
#[derive(Debug, Deserialize)]
pub struct SetParamRequest {
    pub value: f64,
}

/// Response body for `GET /v1/loan/terms`.
#[derive(Debug, Serialize)]
pub struct TermsResponse {
    pub min_months: u32,
    pub max_months: u32,
    pub step_months: u32,
    pub default_months: u32,
    pub options: Vec<u32>,
}

/// Request body for `POST /v1/loan/amount`.
#[derive(Debug, Deserialize)]
pub struct LoanAmountRequest {
    pub collateral_amount: f64,
}

/// Response body for `POST /v1/loan/amount`.
#[derive(Debug, Serialize)]
pub struct LoanAmountResponse {
    pub loan_amount: f64,
    pub loan_to_value_ratio: f64,
}

/// Request body for `POST /v1/loan/repayment`.
#[derive(Debug, Deserialize)]
pub struct RepaymentRequest {
    pub loan_amount: f64,
    pub term_months: u32,
}

/// Response body for `POST /v1/loan/repayment`.
#[derive(Debug, Serialize)]
pub struct RepaymentResponse {
    pub repayment_amount: f64,
    pub annual_interest_rate: f64,
}

/// Response body for `POST /v1/loan/quote`.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub collateral_amount: f64,
    pub term_months: u32,
    pub loan_amount: f64,
    pub repayment_amount: f64,
    pub monthly_payment: Option<f64>,
    pub total_interest: f64,
    pub loan_to_value_ratio: f64,
    pub annual_interest_rate: f64,
}

impl From<LoanQuote> for QuoteResponse {
    fn from(quote: LoanQuote) -> Self {
        Self {
            collateral_amount: quote.collateral_amount,
            term_months: quote.term_months,
            loan_amount: quote.loan_amount,
            repayment_amount: quote.repayment_amount,
            monthly_payment: quote.monthly_payment(),
            total_interest: quote.total_interest(),
            loan_to_value_ratio: quote.rates.loan_to_value_ratio,
            annual_interest_rate: quote.rates.annual_interest_rate,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Stored rate parameters as `[key, value]` pairs, sorted by key.
async fn get_params(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<(String, f64)>>, AppError> {
    Ok(Json(state.rate_store.pairs().await?))
}

/// Update one rate parameter. Admin only.
async fn set_param(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    ApiJson(body): ApiJson<SetParamRequest>,
) -> Result<Json<Vec<(String, f64)>>, AppError> {
    state.rate_store.set(&key, body.value).await?;
    Ok(Json(state.rate_store.pairs().await?))
}

async fn get_terms(State(state): State<Arc<AppState>>) -> Json<TermsResponse> {
    let schedule = state.term_schedule;
    Json(TermsResponse {
        min_months: schedule.min_months,
        max_months: schedule.max_months,
        step_months: schedule.step_months,
        default_months: schedule.default_months,
        options: schedule.options(),
    })
}

/// Borrowing limit for a collateral amount at the stored loan-to-value ratio.
async fn loan_amount(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoanAmountRequest>,
) -> Result<Json<LoanAmountResponse>, AppError> {
    let collateral = validate_amount("collateral amount", body.collateral_amount)?;
    let rates = state.rate_store.current().await?;

    Ok(Json(LoanAmountResponse {
        loan_amount: calculate_loan_amount(collateral, rates.loan_to_value_ratio),
        loan_to_value_ratio: rates.loan_to_value_ratio,
    }))
}

/// Total repayment for a principal at the stored interest rate.
///
/// A zero-month term is allowed here and repays the principal unchanged.
async fn repayment_amount(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RepaymentRequest>,
) -> Result<Json<RepaymentResponse>, AppError> {
    let loan = validate_amount("loan amount", body.loan_amount)?;
    let rates = state.rate_store.current().await?;

    Ok(Json(RepaymentResponse {
        repayment_amount: calculate_repayment_amount(
            loan,
            body.term_months,
            rates.annual_interest_rate,
        ),
        annual_interest_rate: rates.annual_interest_rate,
    }))
}

/// Full quote with derived display values.
async fn quote(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let rates = state.rate_store.current().await?;
    let quote = LoanQuote::compute(&body, &rates)?;
    Ok(Json(quote.into()))
}
