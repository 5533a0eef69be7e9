//! Rate parameters supplied by the content service.
//!
//! The service publishes parameters as a sequence of `(key, value)` pairs.
//! [`RateParameters::from_pairs`] turns that sequence into typed rates and
//! substitutes the defaults below for anything missing or unusable, so a
//! partial or failed fetch still yields a working calculator.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ParamsError;

/// Wire key for the loan-to-value ratio.
pub const LOAN_TO_VALUE_RATIO_KEY: &str = "loanToValueRatio";

/// Wire key for the annual interest rate.
pub const INTEREST_RATE_KEY: &str = "interestRate";

/// Loan-to-value ratio used when the service does not provide one.
pub const DEFAULT_LOAN_TO_VALUE_RATIO: f64 = 0.7;

/// Annual interest rate used when the service does not provide one.
pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 0.05;

/// Every key the calculator understands.
pub const KNOWN_KEYS: [&str; 2] = [INTEREST_RATE_KEY, LOAN_TO_VALUE_RATIO_KEY];

/// Rates that drive one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    /// Fraction of collateral value that may be borrowed, in `[0, 1]`.
    pub loan_to_value_ratio: f64,
    /// Simple annual interest rate as a fraction, `>= 0`.
    pub annual_interest_rate: f64,
}

impl Default for RateParameters {
    fn default() -> Self {
        Self {
            loan_to_value_ratio: DEFAULT_LOAN_TO_VALUE_RATIO,
            annual_interest_rate: DEFAULT_ANNUAL_INTEREST_RATE,
        }
    }
}

impl RateParameters {
    /// Build validated rate parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::LoanToValueOutOfRange`] or
    /// [`ParamsError::InterestRateOutOfRange`] for out-of-range or
    /// non-finite values.
    pub fn new(loan_to_value_ratio: f64, annual_interest_rate: f64) -> Result<Self, ParamsError> {
        Ok(Self {
            loan_to_value_ratio: validate_loan_to_value(loan_to_value_ratio)?,
            annual_interest_rate: validate_interest_rate(annual_interest_rate)?,
        })
    }

    /// Build rate parameters from the service's key/value sequence.
    ///
    /// A key that is absent falls back to its default. A key whose value
    /// fails validation also falls back, with a warning. Unknown keys are
    /// ignored. If a key repeats, the first occurrence wins.
    ///
    /// A published `0` is a valid value and is kept. It is not treated as
    /// missing, unlike a falsy-or-default lookup (`value || 0.7`), which would
    /// swap it for the default.
    #[must_use]
    pub fn from_pairs<K: AsRef<str>>(pairs: &[(K, f64)]) -> Self {
        let lookup = |wanted: &str| {
            pairs
                .iter()
                .find(|(key, _)| key.as_ref() == wanted)
                .map(|(_, value)| *value)
        };

        let loan_to_value_ratio = lookup(LOAN_TO_VALUE_RATIO_KEY).map_or(
            DEFAULT_LOAN_TO_VALUE_RATIO,
            |value| match validate_loan_to_value(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, default = DEFAULT_LOAN_TO_VALUE_RATIO, "using default loan-to-value ratio");
                    DEFAULT_LOAN_TO_VALUE_RATIO
                }
            },
        );

        let annual_interest_rate = lookup(INTEREST_RATE_KEY).map_or(
            DEFAULT_ANNUAL_INTEREST_RATE,
            |value| match validate_interest_rate(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, default = DEFAULT_ANNUAL_INTEREST_RATE, "using default interest rate");
                    DEFAULT_ANNUAL_INTEREST_RATE
                }
            },
        );

        Self {
            loan_to_value_ratio,
            annual_interest_rate,
        }
    }

    /// The key/value form published by the content service, sorted by key.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, f64)> {
        vec![
            (INTEREST_RATE_KEY.to_owned(), self.annual_interest_rate),
            (LOAN_TO_VALUE_RATIO_KEY.to_owned(), self.loan_to_value_ratio),
        ]
    }
}

/// Validate a value for a known key.
///
/// Returns `None` for unknown keys.
pub(crate) fn validate_for_key(key: &str, value: f64) -> Option<Result<f64, ParamsError>> {
    match key {
        LOAN_TO_VALUE_RATIO_KEY => Some(validate_loan_to_value(value)),
        INTEREST_RATE_KEY => Some(validate_interest_rate(value)),
        _ => None,
    }
}

fn validate_loan_to_value(value: f64) -> Result<f64, ParamsError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParamsError::LoanToValueOutOfRange { value })
    }
}

fn validate_interest_rate(value: f64) -> Result<f64, ParamsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParamsError::InterestRateOutOfRange { value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_constants() {
        let params = RateParameters::default();
        assert!((params.loan_to_value_ratio - 0.7).abs() < f64::EPSILON);
        assert!((params.annual_interest_rate - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_pairs_fall_back_to_defaults() {
        let pairs: Vec<(String, f64)> = Vec::new();
        assert_eq!(RateParameters::from_pairs(&pairs), RateParameters::default());
    }

    #[test]
    fn present_keys_override_defaults() {
        let params =
            RateParameters::from_pairs(&[("loanToValueRatio", 0.6), ("interestRate", 0.08)]);
        assert_eq!(params, RateParameters::new(0.6, 0.08).unwrap());
    }

    #[test]
    fn missing_key_only_defaults_that_key() {
        let params = RateParameters::from_pairs(&[("interestRate", 0.1)]);
        assert!((params.loan_to_value_ratio - DEFAULT_LOAN_TO_VALUE_RATIO).abs() < f64::EPSILON);
        assert!((params.annual_interest_rate - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_values_are_kept() {
        let params = RateParameters::from_pairs(&[("loanToValueRatio", 0.0), ("interestRate", 0.0)]);
        assert_eq!(params, RateParameters::new(0.0, 0.0).unwrap());
    }

    #[test]
    fn invalid_values_fall_back() {
        let params = RateParameters::from_pairs(&[
            ("loanToValueRatio", 1.5),
            ("interestRate", f64::NAN),
        ]);
        assert_eq!(params, RateParameters::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let params = RateParameters::from_pairs(&[("maxTermMonths", 36.0)]);
        assert_eq!(params, RateParameters::default());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(matches!(
            RateParameters::new(-0.1, 0.05),
            Err(ParamsError::LoanToValueOutOfRange { .. })
        ));
        assert!(matches!(
            RateParameters::new(0.7, -0.01),
            Err(ParamsError::InterestRateOutOfRange { .. })
        ));
        assert!(matches!(
            RateParameters::new(0.7, f64::INFINITY),
            Err(ParamsError::InterestRateOutOfRange { .. })
        ));
    }

    #[test]
    fn to_pairs_reads_back_through_from_pairs() {
        let params = RateParameters::new(0.55, 0.045).unwrap();
        assert_eq!(RateParameters::from_pairs(&params.to_pairs()), params);
    }

    #[test]
    fn validate_for_key_knows_only_calculator_keys() {
        assert!(validate_for_key("interestRate", 0.05).is_some());
        assert!(validate_for_key("loanToValueRatio", 2.0).is_some_and(|r| r.is_err()));
        assert!(validate_for_key("tagline", 1.0).is_none());
    }
}
