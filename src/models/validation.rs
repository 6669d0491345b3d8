//! Field checks shared by the input models.
//!
//! Each check appends to a violation list instead of returning early, so a
//! single pass over an input reports everything that is wrong with it.

use rust_decimal::Decimal;

use crate::error::Violation;

/// Upper bound for any single monetary input.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<Violation>);

impl Violations {
    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation::new(field, message));
    }

    /// Monetary amount: zero or more, and below [`MAX_AMOUNT`].
    pub(crate) fn amount(&mut self, field: &str, value: Decimal) {
        if value < Decimal::ZERO {
            self.push(field, "must not be negative");
        } else if value > MAX_AMOUNT {
            self.push(field, format!("must not exceed {}", MAX_AMOUNT));
        }
    }

    pub(crate) fn positive_amount(&mut self, field: &str, value: Decimal) {
        if value <= Decimal::ZERO {
            self.push(field, "must be greater than zero");
        } else if value > MAX_AMOUNT {
            self.push(field, format!("must not exceed {}", MAX_AMOUNT));
        }
    }

    pub(crate) fn in_range(&mut self, field: &str, value: Decimal, min: Decimal, max: Decimal) {
        if value < min || value > max {
            self.push(field, format!("must be between {} and {}", min, max));
        }
    }

    /// Two-letter alphabetic code. Whether it names a real state is a lookup concern.
    pub(crate) fn state_code(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            self.push(field, "must be a two-letter state code");
        }
    }

    pub(crate) fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}
