//! Aurum HTTP server.
//!
//! Serves the rate parameters the loan calculator is driven by, and quote
//! routes that run the calculator against the stored rates. All routes live
//! under `/v1/*` and speak JSON.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
