//! Audit models shared by every derivation.
//!
//! Each pure derivation in [`crate::calculation`] returns an [`AuditStep`]
//! describing the rule that was applied, its inputs, its outputs, and a
//! human-readable explanation. Write paths log these steps, and leave
//! adjustments persist them alongside the record.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a derivation decision.
///
/// # Example
///
/// ```
/// use workforce_engine::models::AuditStep;
///
/// let step = AuditStep {
///     rule_id: "leave_day_count".to_string(),
///     rule_name: "Leave Day Count".to_string(),
///     formula: "ceil(|end - start| / 1 day) + 1".to_string(),
///     input: serde_json::json!({"start_date": "2024-01-10", "end_date": "2024-01-12"}),
///     output: serde_json::json!({"days": 3}),
///     reasoning: "2024-01-10 to 2024-01-12 spans 3 calendar days inclusive".to_string(),
/// };
/// assert_eq!(step.output["days"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The formula the rule evaluates.
    pub formula: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
