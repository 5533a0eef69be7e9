//! Error types for `aurum-core`.
//!
//! The calculator itself is infallible. These errors belong to the layers
//! around it: validating rate parameters, validating quote input, and
//! persisting parameters.

use aurum_storage::StorageError;

/// Errors from rate parameter validation.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// Loan-to-value ratio outside `[0, 1]` or not finite.
    #[error("loan-to-value ratio must be a finite fraction in [0, 1], got {value}")]
    LoanToValueOutOfRange { value: f64 },

    /// Annual interest rate negative or not finite.
    #[error("annual interest rate must be a finite, non-negative fraction, got {value}")]
    InterestRateOutOfRange { value: f64 },
}

/// Errors from quote input validation.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// An amount is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// An amount is below zero.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// A loan term of zero months has no monthly payment.
    #[error("loan term must be at least one month")]
    ZeroTerm,
}

/// Errors from the rate store.
#[derive(Debug, thiserror::Error)]
pub enum RateStoreError {
    /// The parameter key is not one the calculator understands.
    #[error("unknown rate parameter: {key}")]
    UnknownKey { key: String },

    /// The value failed validation for its key.
    #[error("invalid value for '{key}': {source}")]
    Invalid {
        key: String,
        #[source]
        source: ParamsError,
    },

    /// A stored value could not be encoded or decoded.
    #[error("rate parameter '{key}' is not a valid number: {reason}")]
    Encoding { key: String, reason: String },

    /// The underlying storage backend returned an error.
    #[error("rate store storage error: {0}")]
    Storage(#[from] StorageError),
}
