//! Admin authentication middleware.
//!
//! Rate parameter writes require the `X-Aurum-Admin-Token` header to match
//! the configured admin token. Without a configured token, writes are
//! refused outright.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-aurum-admin-token";

/// Middleware guarding admin-only routes.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.admin_token.as_deref() else {
        return AppError::Forbidden("rate parameter writes are disabled".to_owned())
            .into_response();
    };

    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(provided) = provided else {
        return AppError::Unauthorized(format!("missing {ADMIN_TOKEN_HEADER} header"))
            .into_response();
    };

    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        next.run(req).await
    } else {
        warn!(path = %req.uri().path(), "rejected admin request with wrong token");
        AppError::Unauthorized("invalid admin token".to_owned()).into_response()
    }
}
