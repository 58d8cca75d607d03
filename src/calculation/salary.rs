//! Salary derivation.
//!
//! This module turns a base salary plus the allowance, bonus, penalty and
//! deduction bundles into gross and net pay:
//!
//! ```text
//! gross = base + Σallowances + overtime_pay + Σbonuses − Σpenalties
//! net   = gross − Σdeductions
//! ```
//!
//! The derivation is exact decimal arithmetic; nothing is rounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, CompensationInput};

/// The result of deriving gross and net salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Sum of all allowances.
    pub allowances_total: Decimal,
    /// Sum of all bonuses.
    pub bonuses_total: Decimal,
    /// Sum of all penalties.
    pub penalties_total: Decimal,
    /// Sum of all deductions.
    pub deductions_total: Decimal,
    /// Gross salary before deductions.
    pub gross_salary: Decimal,
    /// Net salary after deductions.
    pub net_salary: Decimal,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
}

/// Checks the inputs of a salary derivation.
///
/// Every monetary field (and overtime hours) must be non-negative and the
/// period month must lie in 1..=12. The first offending field is reported.
pub fn validate_compensation(input: &CompensationInput) -> EngineResult<()> {
    input.period.validate()?;

    if input.employee_id.trim().is_empty() {
        return Err(EngineError::validation("employee_id", "must not be empty"));
    }

    if let Some((field, value)) = input
        .amounts()
        .into_iter()
        .find(|(_, value)| value.is_sign_negative() && !value.is_zero())
    {
        return Err(EngineError::validation(
            field,
            format!("must not be negative, got {}", value),
        ));
    }

    Ok(())
}

fn in_range(field: &str, value: Option<Decimal>) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::validation(field, "amount out of range"))
}

/// Derives gross and net salary from validated inputs.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if any input is out of range (see
/// [`validate_compensation`]) or if a total overflows `Decimal`.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::calculate_salary;
/// use workforce_engine::models::{CompensationInput, Period};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut input = CompensationInput::seeded("emp_001", Period::new(1, 2024).unwrap(), Decimal::from(5000));
/// input.allowances.housing = Decimal::from(500);
/// input.overtime_pay = Decimal::from_str("120.50").unwrap();
/// input.penalties.late = Decimal::from(50);
/// input.deductions.tax = Decimal::from(400);
///
/// let breakdown = calculate_salary(&input).unwrap();
/// assert_eq!(breakdown.gross_salary, Decimal::from_str("5570.50").unwrap());
/// assert_eq!(breakdown.net_salary, Decimal::from_str("5170.50").unwrap());
/// ```
pub fn calculate_salary(input: &CompensationInput) -> EngineResult<SalaryBreakdown> {
    validate_compensation(input)?;

    let allowances_total = in_range("allowances", input.allowances.total())?;
    let bonuses_total = in_range("bonuses", input.bonuses.total())?;
    let penalties_total = in_range("penalties", input.penalties.total())?;
    let deductions_total = in_range("deductions", input.deductions.total())?;

    let gross_salary = in_range(
        "gross_salary",
        input
            .base_salary
            .checked_add(allowances_total)
            .and_then(|v| v.checked_add(input.overtime_pay))
            .and_then(|v| v.checked_add(bonuses_total))
            .and_then(|v| v.checked_sub(penalties_total)),
    )?;
    let net_salary = in_range("net_salary", gross_salary.checked_sub(deductions_total))?;

    let audit_step = AuditStep {
        rule_id: "salary_derivation".to_string(),
        rule_name: "Salary Derivation".to_string(),
        formula: "gross = base + allowances + overtime_pay + bonuses - penalties; net = gross - deductions"
            .to_string(),
        input: serde_json::json!({
            "employee_id": input.employee_id,
            "period": input.period.to_string(),
            "base_salary": input.base_salary.normalize().to_string(),
            "allowances_total": allowances_total.normalize().to_string(),
            "overtime_pay": input.overtime_pay.normalize().to_string(),
            "bonuses_total": bonuses_total.normalize().to_string(),
            "penalties_total": penalties_total.normalize().to_string(),
            "deductions_total": deductions_total.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "net_salary": net_salary.normalize().to_string()
        }),
        reasoning: format!(
            "{} base + {} allowances + {} overtime + {} bonuses - {} penalties = {} gross; {} gross - {} deductions = {} net",
            input.base_salary.normalize(),
            allowances_total.normalize(),
            input.overtime_pay.normalize(),
            bonuses_total.normalize(),
            penalties_total.normalize(),
            gross_salary.normalize(),
            gross_salary.normalize(),
            deductions_total.normalize(),
            net_salary.normalize()
        ),
    };

    Ok(SalaryBreakdown {
        allowances_total,
        bonuses_total,
        penalties_total,
        deductions_total,
        gross_salary,
        net_salary,
        audit_step,
    })
}
