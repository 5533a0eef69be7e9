//! Loan quotes.
//!
//! A [`QuoteRequest`] is what a borrower enters. [`LoanQuote::compute`]
//! validates it, runs the calculator with the supplied rates, and keeps the
//! inputs alongside the results so the derived display values (monthly
//! payment, total interest) can be read off the quote.

use serde::{Deserialize, Serialize};

use crate::calculator::{calculate_loan_amount, calculate_repayment_amount};
use crate::error::QuoteError;
use crate::params::RateParameters;

/// Borrower input for a quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Collateral pledged, in value units.
    pub collateral_amount: f64,
    /// Loan duration in months.
    pub term_months: u32,
}

impl QuoteRequest {
    /// Reject input the calculator must never see.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::NonFinite`] for NaN or infinite collateral,
    /// [`QuoteError::Negative`] for collateral below zero, and
    /// [`QuoteError::ZeroTerm`] for a zero-month term.
    pub fn validate(&self) -> Result<(), QuoteError> {
        validate_amount("collateral amount", self.collateral_amount)?;
        if self.term_months == 0 {
            return Err(QuoteError::ZeroTerm);
        }
        Ok(())
    }
}

/// Check that a monetary input is finite and non-negative.
///
/// # Errors
///
/// Returns [`QuoteError::NonFinite`] or [`QuoteError::Negative`], naming
/// `field` in the message.
pub fn validate_amount(field: &'static str, value: f64) -> Result<f64, QuoteError> {
    if !value.is_finite() {
        return Err(QuoteError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(QuoteError::Negative { field, value });
    }
    Ok(value)
}

/// A computed loan quote. Created per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub collateral_amount: f64,
    pub term_months: u32,
    pub loan_amount: f64,
    pub repayment_amount: f64,
    /// Rates the quote was computed with.
    pub rates: RateParameters,
}

impl LoanQuote {
    /// Validate the request and compute a quote with the given rates.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] if the request fails validation.
    pub fn compute(request: &QuoteRequest, rates: &RateParameters) -> Result<Self, QuoteError> {
        request.validate()?;

        let loan_amount = calculate_loan_amount(request.collateral_amount, rates.loan_to_value_ratio);
        let repayment_amount =
            calculate_repayment_amount(loan_amount, request.term_months, rates.annual_interest_rate);

        Ok(Self {
            collateral_amount: request.collateral_amount,
            term_months: request.term_months,
            loan_amount,
            repayment_amount,
            rates: *rates,
        })
    }

    /// Repayment spread evenly over the term. `None` for a zero-month term.
    #[must_use]
    pub fn monthly_payment(&self) -> Option<f64> {
        (self.term_months > 0).then(|| self.repayment_amount / f64::from(self.term_months))
    }

    /// Interest paid over the whole term.
    #[must_use]
    pub fn total_interest(&self) -> f64 {
        self.repayment_amount - self.loan_amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn request(collateral_amount: f64, term_months: u32) -> QuoteRequest {
        QuoteRequest {
            collateral_amount,
            term_months,
        }
    }

    #[test]
    fn default_rates_one_year() {
        let quote = LoanQuote::compute(&request(100.0, 12), &RateParameters::default()).unwrap();
        assert_close(quote.loan_amount, 70.0);
        assert_close(quote.repayment_amount, 73.5);
        assert_close(quote.total_interest(), 3.5);
        assert_close(quote.monthly_payment().unwrap(), 6.125);
    }

    #[test]
    fn three_year_term() {
        let quote = LoanQuote::compute(&request(100.0, 36), &RateParameters::default()).unwrap();
        assert_close(quote.repayment_amount, 80.5);
        assert_close(quote.total_interest(), 10.5);
    }

    #[test]
    fn zero_collateral_quotes_zero() {
        let quote = LoanQuote::compute(&request(0.0, 12), &RateParameters::default()).unwrap();
        assert_close(quote.loan_amount, 0.0);
        assert_close(quote.repayment_amount, 0.0);
        assert_close(quote.monthly_payment().unwrap(), 0.0);
    }

    #[test]
    fn quote_records_rates_used() {
        let rates = RateParameters::new(0.5, 0.1).unwrap();
        let quote = LoanQuote::compute(&request(200.0, 6), &rates).unwrap();
        assert_eq!(quote.rates, rates);
        assert_close(quote.loan_amount, 100.0);
        assert_close(quote.repayment_amount, 105.0);
    }

    #[test]
    fn off_schedule_terms_are_accepted() {
        let quote = LoanQuote::compute(&request(100.0, 7), &RateParameters::default()).unwrap();
        assert_eq!(quote.term_months, 7);
    }

    #[test]
    fn rejects_bad_input() {
        let rates = RateParameters::default();
        assert!(matches!(
            LoanQuote::compute(&request(f64::NAN, 12), &rates),
            Err(QuoteError::NonFinite { .. })
        ));
        assert!(matches!(
            LoanQuote::compute(&request(-1.0, 12), &rates),
            Err(QuoteError::Negative { .. })
        ));
        assert!(matches!(
            LoanQuote::compute(&request(10.0, 0), &rates),
            Err(QuoteError::ZeroTerm)
        ));
    }

    #[test]
    fn validate_amount_names_the_field() {
        let err = validate_amount("loan amount", -3.0).unwrap_err();
        assert_eq!(err.to_string(), "loan amount must not be negative, got -3");
        assert!(validate_amount("loan amount", f64::INFINITY).is_err());
        assert!((validate_amount("loan amount", 0.0).unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_payment_guards_zero_term() {
        let quote = LoanQuote {
            collateral_amount: 10.0,
            term_months: 0,
            loan_amount: 7.0,
            repayment_amount: 7.0,
            rates: RateParameters::default(),
        };
        assert_eq!(quote.monthly_payment(), None);
        assert_close(quote.total_interest(), 0.0);
    }
}
