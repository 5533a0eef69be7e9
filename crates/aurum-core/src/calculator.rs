//! Loan calculator.
//!
//! Two pure functions: the borrowing limit for a collateral amount, and the
//! total repayment for a loan under simple (non-compounding) interest.
//!
//! The collateral amount is taken as already denominated in value units.
//! There is no price feed, so the per-unit price is the constant
//! [`COLLATERAL_UNIT_PRICE`].
//!
//! Neither function validates its input. Callers reject non-finite or
//! negative values beforehand (see [`crate::quote::QuoteRequest::validate`]).

/// Value of one unit of collateral.
pub const COLLATERAL_UNIT_PRICE: f64 = 1.0;

/// Months per year used to turn an annual rate into a per-term fraction.
const MONTHS_PER_YEAR: f64 = 12.0;

/// Maximum loan principal for the given collateral.
///
/// `collateral_amount × COLLATERAL_UNIT_PRICE × loan_to_value_ratio`, which
/// with a unit price of 1 is `collateral_amount × loan_to_value_ratio`
/// exactly. A negative collateral amount produces a negative result; it is
/// not clamped.
#[must_use]
pub fn calculate_loan_amount(collateral_amount: f64, loan_to_value_ratio: f64) -> f64 {
    collateral_amount * COLLATERAL_UNIT_PRICE * loan_to_value_ratio
}

/// Total amount due at the end of the term.
///
/// Interest accrues linearly: `annual_interest_rate × term_months / 12` of
/// the principal. A term of zero months accrues nothing and returns
/// `loan_amount` unchanged.
#[must_use]
pub fn calculate_repayment_amount(
    loan_amount: f64,
    term_months: u32,
    annual_interest_rate: f64,
) -> f64 {
    let interest_fraction = annual_interest_rate * (f64::from(term_months) / MONTHS_PER_YEAR);
    loan_amount * (1.0 + interest_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn loan_amount_applies_ltv() {
        assert_close(calculate_loan_amount(100.0, 0.7), 70.0);
    }

    #[test]
    fn zero_collateral_borrows_nothing() {
        assert_close(calculate_loan_amount(0.0, 0.7), 0.0);
        assert_close(calculate_repayment_amount(0.0, 12, 0.05), 0.0);
    }

    #[test]
    fn negative_collateral_is_passed_through() {
        assert_close(calculate_loan_amount(-10.0, 0.5), -5.0);
    }

    #[test]
    fn one_year_at_five_percent() {
        assert_close(calculate_repayment_amount(70.0, 12, 0.05), 73.5);
    }

    #[test]
    fn three_years_is_simple_not_compound() {
        assert_close(calculate_repayment_amount(70.0, 36, 0.05), 80.5);
    }

    #[test]
    fn zero_term_accrues_no_interest() {
        for rate in [0.0, 0.05, 0.3, 2.0] {
            assert_close(calculate_repayment_amount(1234.5, 0, rate), 1234.5);
        }
    }

    #[test]
    fn partial_year_term() {
        // 3 months at 8% is 2% of principal.
        assert_close(calculate_repayment_amount(1000.0, 3, 0.08), 1020.0);
    }

    #[test]
    fn zero_rate_repays_principal() {
        assert_close(calculate_repayment_amount(500.0, 24, 0.0), 500.0);
    }

    #[test]
    fn loan_amount_is_monotone_in_collateral_and_ratio() {
        let collaterals = [0.0, 0.5, 1.0, 10.0, 250.0, 1e6];
        let ratios = [0.0, 0.1, 0.5, 0.7, 1.0];

        for r in ratios {
            for pair in collaterals.windows(2) {
                assert!(calculate_loan_amount(pair[0], r) <= calculate_loan_amount(pair[1], r));
            }
        }
        for c in collaterals {
            for pair in ratios.windows(2) {
                assert!(calculate_loan_amount(c, pair[0]) <= calculate_loan_amount(c, pair[1]));
            }
        }
    }

    #[test]
    fn repayment_never_below_principal() {
        for loan in [0.0, 1.0, 70.0, 99_999.99] {
            for term in [0, 1, 3, 12, 36, 120] {
                for rate in [0.0, 0.01, 0.05, 0.25] {
                    assert!(calculate_repayment_amount(loan, term, rate) >= loan);
                }
            }
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let a = calculate_repayment_amount(calculate_loan_amount(42.0, 0.65), 18, 0.07);
        let b = calculate_repayment_amount(calculate_loan_amount(42.0, 0.65), 18, 0.07);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
