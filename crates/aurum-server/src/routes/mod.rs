//! HTTP route handlers for Aurum.
//!
//! Routes are organized by subsystem:
//! - `sys`: health check
//! - `loan`: rate parameters, term schedule, and quote calculation

pub mod loan;
pub mod sys;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::ADMIN_TOKEN_HEADER;
use crate::state::AppState;

/// Build the full application router with middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The landing page fetches rates cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ]);

    Router::new()
        .nest("/v1/sys", sys::router())
        .nest("/v1/loan", loan::router(Arc::clone(&state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}
