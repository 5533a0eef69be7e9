//! Loan term schedule offered to borrowers.
//!
//! Terms run from 3 to 36 months in 3-month steps, defaulting to 12. The
//! schedule is what the presentation layer offers; the calculator and quote
//! validation accept any positive term.

use serde::{Deserialize, Serialize};

/// Shortest offered term.
pub const MIN_TERM_MONTHS: u32 = 3;

/// Longest offered term.
pub const MAX_TERM_MONTHS: u32 = 36;

/// Spacing between offered terms.
pub const TERM_STEP_MONTHS: u32 = 3;

/// Term preselected for a new quote.
pub const DEFAULT_TERM_MONTHS: u32 = 12;

/// The offered term schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSchedule {
    pub min_months: u32,
    pub max_months: u32,
    pub step_months: u32,
    pub default_months: u32,
}

impl Default for TermSchedule {
    fn default() -> Self {
        Self {
            min_months: MIN_TERM_MONTHS,
            max_months: MAX_TERM_MONTHS,
            step_months: TERM_STEP_MONTHS,
            default_months: DEFAULT_TERM_MONTHS,
        }
    }
}

impl TermSchedule {
    /// Every offered term, ascending.
    #[must_use]
    pub fn options(&self) -> Vec<u32> {
        if self.step_months == 0 {
            return vec![self.min_months];
        }
        (self.min_months..=self.max_months)
            .step_by(self.step_months as usize)
            .collect()
    }

    /// Whether `term_months` is one of the offered terms.
    #[must_use]
    pub fn contains(&self, term_months: u32) -> bool {
        if self.step_months == 0 {
            return term_months == self.min_months;
        }
        (self.min_months..=self.max_months).contains(&term_months)
            && (term_months - self.min_months) % self.step_months == 0
    }
}
