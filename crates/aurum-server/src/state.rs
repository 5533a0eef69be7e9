//! Shared application state for the Aurum server.
//!
//! A single [`AppState`] is built at startup and shared across all Axum
//! handlers via `Arc`.

use std::sync::Arc;

use aurum_core::rates::RateStore;
use aurum_core::term::TermSchedule;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Rate parameters served to calculator clients.
    pub rate_store: Arc<RateStore>,
    /// Terms offered to borrowers.
    pub term_schedule: TermSchedule,
    /// Token required for rate parameter writes (None disables writes).
    pub admin_token: Option<String>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("term_schedule", &self.term_schedule)
            .finish_non_exhaustive()
    }
}
