//! System routes: `/v1/sys/*`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Build the `/v1/sys` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// Response body for `GET /v1/sys/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Whether the rate store answered.
    pub storage_ok: bool,
    /// Number of rate parameters currently stored.
    pub parameters: usize,
    /// Server version.
    pub version: &'static str,
}

/// Health check. Returns 200 when the rate store is readable, 503 otherwise.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.rate_store.pairs().await {
        Ok(pairs) => (
            StatusCode::OK,
            Json(HealthResponse {
                storage_ok: true,
                parameters: pairs.len(),
                version: env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "health check could not read rate store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    storage_ok: false,
                    parameters: 0,
                    version: env!("CARGO_PKG_VERSION"),
                }),
            )
        }
    }
}
