//! Error types for the locum calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating contracts,
//! paychecks and comparisons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated constraint on an input field.
///
/// Validation never stops at the first problem; every violation found in an
/// input is collected into a list of these.
///
/// # Example
///
/// ```
/// use locum_calc::error::Violation;
///
/// let violation = Violation::new("hours_per_week", "must be between 1 and 168");
/// assert_eq!(violation.to_string(), "hours_per_week: must be between 1 and 168");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending field (e.g. `stipends.housing`, `bonuses[1].amount`).
    pub field: String,
    /// What is wrong with the value.
    pub message: String,
}

impl Violation {
    /// Creates a violation for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns a copy of this violation with its field path nested under `prefix`.
    pub fn prefixed(&self, prefix: &str) -> Self {
        Self {
            field: format!("{}.{}", prefix, self.field),
            message: self.message.clone(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The main error type for the calculation engine.
///
/// All operations in the engine return this error type. Failures are
/// all-or-nothing: an operation either returns a complete result or one of
/// these errors, never a partial result.
///
/// # Example
///
/// ```
/// use locum_calc::error::EngineError;
///
/// let error = EngineError::JurisdictionNotFound {
///     code: "PR".to_string(),
/// };
/// assert_eq!(error.to_string(), "Jurisdiction not found: PR");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reference data file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Reference data file could not be parsed or is inconsistent.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input failed validation. Carries every violation, not just the first.
    #[error("Validation failed: {}", join_violations(.violations))]
    Validation {
        /// All violated constraints.
        violations: Vec<Violation>,
    },

    /// State code is not one of the 50 supported US states.
    #[error("Jurisdiction not found: {code}")]
    JurisdictionNotFound {
        /// The unrecognised state code.
        code: String,
    },

    /// An arithmetic invariant was violated during calculation.
    #[error("Computation error: {message}")]
    Computation {
        /// A description of the violated invariant.
        message: String,
    },
}

impl EngineError {
    /// Builds a validation error from collected violations.
    pub fn validation(violations: Vec<Violation>) -> Self {
        EngineError::Validation { violations }
    }

    /// Returns the violations if this is a validation error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            EngineError::Validation { violations } => violations,
            _ => &[],
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Turns a list of violations into `Ok(())` when empty, or a validation error.
pub fn ensure_valid(violations: Vec<Violation>) -> EngineResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::validation(violations))
    }
}
