//! Core library for Aurum.
//!
//! Contains the gold-collateral loan calculator, the rate parameters it is
//! driven by, quote construction with input validation, the loan term
//! schedule, and the rate store that persists parameters through an
//! `aurum-storage` backend.
//!
//! The calculator functions are pure: they take rates as arguments and never
//! read configuration or storage themselves.

pub mod calculator;
pub mod error;
pub mod params;
pub mod quote;
pub mod rates;
pub mod term;

pub use calculator::{calculate_loan_amount, calculate_repayment_amount};
pub use params::RateParameters;
pub use quote::{LoanQuote, QuoteRequest};
