//! Audit trace models.
//!
//! Every calculation records the rules it applied, their inputs and outputs,
//! and a human-readable explanation, so a result can be traced back to the
//! figures that produced it.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Statute or publication the rule follows.
    pub reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use locum_calc::models::AuditTrace;
///
/// let mut trace = AuditTrace::default();
/// trace.record(
///     "base_pay",
///     "Base Pay",
///     "contract terms",
///     serde_json::json!({"hourly_rate": "100"}),
///     serde_json::json!({"base_pay": "52000.00"}),
///     "100 x 40h x 13 weeks",
/// );
/// assert_eq!(trace.steps[0].step_number, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the last one.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        reference: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            reference: reference.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        });
    }

    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_numbers_steps_sequentially() {
        let mut trace = AuditTrace::default();
        trace.record("a", "A", "ref", json!({}), json!({}), "first");
        trace.record("b", "B", "ref", json!({}), json!({}), "second");

        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.steps[1].step_number, 2);
        assert_eq!(trace.steps[1].rule_id, "b");
    }

    #[test]
    fn test_warn_and_has_warning() {
        let mut trace = AuditTrace::default();
        trace.warn("LONG_HOURS", "over 80 hours a week", "medium");
        assert!(trace.has_warning("LONG_HOURS"));
        assert!(!trace.has_warning("OTHER"));
    }

    #[test]
    fn test_audit_trace_serialization() {
        let mut trace = AuditTrace::default();
        trace.record(
            "base_pay",
            "Base Pay",
            "contract terms",
            json!({"hourly_rate": "100"}),
            json!({"base_pay": "52000.00"}),
            "100 x 40 x 13",
        );
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"rule_id\":\"base_pay\""));
        assert!(json.contains("\"step_number\":1"));

        let deserialized: AuditTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(trace, deserialized);
    }
}
