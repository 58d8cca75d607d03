//! Compensation record model and its adjustment bundles.
//!
//! A [`CompensationRecord`] holds one employee's pay inputs for one
//! [`Period`] together with the derived gross and net salary. The derived
//! values are private and only change through
//! [`CompensationRecord::apply_breakdown`], so they can never drift from the
//! inputs they were computed from.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::SalaryBreakdown;
use crate::error::{EngineError, EngineResult};

/// A monthly pay period.
///
/// # Example
///
/// ```
/// use workforce_engine::models::Period;
///
/// let period = Period::new(1, 2024).unwrap();
/// assert_eq!(period.to_string(), "2024-01");
/// assert!(Period::new(13, 2024).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Month of the year (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl Period {
    /// Creates a validated period.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        let period = Self { month, year };
        period.validate()?;
        Ok(period)
    }

    /// Checks that the month lies in 1..=12.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(EngineError::validation(
                "month",
                format!("must be between 1 and 12, got {}", self.month),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Adds up named amounts, `None` if the sum leaves the `Decimal` range.
fn checked_sum(fields: &[(&'static str, Decimal)]) -> Option<Decimal> {
    fields
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, value)| acc.checked_add(*value))
}

/// Allowances paid on top of base salary. Absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Allowances {
    /// Housing allowance.
    pub housing: Decimal,
    /// Transportation allowance.
    pub transportation: Decimal,
    /// Meal allowance.
    pub meal: Decimal,
    /// Any other allowance.
    pub other: Decimal,
}

impl Allowances {
    /// Named fields, used for validation and audit output.
    pub fn fields(&self) -> [(&'static str, Decimal); 4] {
        [
            ("allowances.housing", self.housing),
            ("allowances.transportation", self.transportation),
            ("allowances.meal", self.meal),
            ("allowances.other", self.other),
        ]
    }

    /// Sum of all allowances.
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(&self.fields())
    }
}

/// Bonuses paid for the period. Absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bonuses {
    /// Performance bonus.
    pub performance: Decimal,
    /// Project bonus.
    pub project: Decimal,
    /// Any other bonus.
    pub other: Decimal,
}

impl Bonuses {
    /// Named fields, used for validation and audit output.
    pub fn fields(&self) -> [(&'static str, Decimal); 3] {
        [
            ("bonuses.performance", self.performance),
            ("bonuses.project", self.project),
            ("bonuses.other", self.other),
        ]
    }

    /// Sum of all bonuses.
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(&self.fields())
    }
}

/// Penalties withheld before gross salary. Absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    /// Late arrival penalty.
    pub late: Decimal,
    /// Absence penalty.
    pub absent: Decimal,
    /// Any other penalty.
    pub other: Decimal,
}

impl Penalties {
    /// Named fields, used for validation and audit output.
    pub fn fields(&self) -> [(&'static str, Decimal); 3] {
        [
            ("penalties.late", self.late),
            ("penalties.absent", self.absent),
            ("penalties.other", self.other),
        ]
    }

    /// Sum of all penalties.
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(&self.fields())
    }
}

/// Statutory and other deductions taken from gross salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Income tax.
    pub tax: Decimal,
    /// Social insurance contribution.
    pub social_insurance: Decimal,
    /// Health insurance contribution.
    pub health_insurance: Decimal,
    /// Unemployment insurance contribution.
    pub unemployment_insurance: Decimal,
    /// Any other deduction.
    pub other: Decimal,
}

impl Deductions {
    /// Named fields, used for validation and audit output.
    pub fn fields(&self) -> [(&'static str, Decimal); 5] {
        [
            ("deductions.tax", self.tax),
            ("deductions.social_insurance", self.social_insurance),
            ("deductions.health_insurance", self.health_insurance),
            ("deductions.unemployment_insurance", self.unemployment_insurance),
            ("deductions.other", self.other),
        ]
    }

    /// Sum of all deductions.
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(&self.fields())
    }
}

/// Payment lifecycle of a compensation record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationStatus {
    /// Awaiting payment; inputs may still be edited.
    #[default]
    Pending,
    /// Paid out.
    Paid,
    /// Voided.
    Cancelled,
}

/// Every input the salary derivation reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationInput {
    /// Employee reference in the directory.
    pub employee_id: String,
    /// The pay period.
    #[serde(flatten)]
    pub period: Period,
    /// Base salary for the period.
    pub base_salary: Decimal,
    /// Allowance bundle.
    #[serde(default)]
    pub allowances: Allowances,
    /// Bonus bundle.
    #[serde(default)]
    pub bonuses: Bonuses,
    /// Penalty bundle.
    #[serde(default)]
    pub penalties: Penalties,
    /// Overtime hours worked in the period (informational).
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Overtime pay for the period.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Deduction bundle.
    #[serde(default)]
    pub deductions: Deductions,
}

impl CompensationInput {
    /// Inputs for a freshly seeded payroll record: base salary only.
    pub fn seeded(employee_id: impl Into<String>, period: Period, base_salary: Decimal) -> Self {
        Self {
            employee_id: employee_id.into(),
            period,
            base_salary,
            allowances: Allowances::default(),
            bonuses: Bonuses::default(),
            penalties: Penalties::default(),
            overtime_hours: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            deductions: Deductions::default(),
        }
    }

    /// All monetary and hour fields by name.
    pub fn amounts(&self) -> Vec<(&'static str, Decimal)> {
        let mut amounts = vec![
            ("base_salary", self.base_salary),
            ("overtime_hours", self.overtime_hours),
            ("overtime_pay", self.overtime_pay),
        ];
        amounts.extend(self.allowances.fields());
        amounts.extend(self.bonuses.fields());
        amounts.extend(self.penalties.fields());
        amounts.extend(self.deductions.fields());
        amounts
    }
}

/// One employee's compensation for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Pay inputs.
    #[serde(flatten)]
    pub inputs: CompensationInput,
    gross_salary: Decimal,
    net_salary: Decimal,
    /// Payment status.
    pub status: CompensationStatus,
    /// Date the record was paid, once paid.
    pub payment_date: Option<NaiveDate>,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

impl CompensationRecord {
    /// Builds a pending record from inputs and their derived breakdown.
    pub fn new(inputs: CompensationInput, breakdown: &SalaryBreakdown, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            inputs,
            gross_salary: breakdown.gross_salary,
            net_salary: breakdown.net_salary,
            status: CompensationStatus::Pending,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the derived salary figures.
    pub fn apply_breakdown(&mut self, breakdown: &SalaryBreakdown) {
        self.gross_salary = breakdown.gross_salary;
        self.net_salary = breakdown.net_salary;
    }

    /// Derived gross salary.
    pub fn gross_salary(&self) -> Decimal {
        self.gross_salary
    }

    /// Derived net salary.
    pub fn net_salary(&self) -> Decimal {
        self.net_salary
    }

    /// The store's uniqueness key: one record per employee and period.
    pub fn period_key(&self) -> (String, Period) {
        (self.inputs.employee_id.clone(), self.inputs.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_period_rejects_month_out_of_range() {
        assert!(Period::new(0, 2024).is_err());
        assert!(Period::new(13, 2024).is_err());
        assert!(Period::new(12, 2024).is_ok());
    }

    #[test]
    fn test_bundles_default_missing_fields_to_zero() {
        let allowances: Allowances = serde_json::from_str(r#"{"housing": "500"}"#).unwrap();
        assert_eq!(allowances.housing, dec("500"));
        assert_eq!(allowances.meal, Decimal::ZERO);
        assert_eq!(allowances.total(), Some(dec("500")));
    }

    #[test]
    fn test_deductions_total() {
        let deductions = Deductions {
            tax: dec("100"),
            social_insurance: dec("80"),
            health_insurance: dec("15"),
            unemployment_insurance: dec("10"),
            other: dec("5"),
        };
        assert_eq!(deductions.total(), Some(dec("210")));
    }

    #[test]
    fn test_bundle_total_out_of_range_is_none() {
        let bonuses = Bonuses {
            performance: Decimal::MAX,
            project: dec("1"),
            other: Decimal::ZERO,
        };
        assert_eq!(bonuses.total(), None);
    }

    #[test]
    fn test_deserialize_input_with_flattened_period() {
        let json = r#"{
            "employee_id": "emp_001",
            "month": 3,
            "year": 2024,
            "base_salary": "1000.00",
            "bonuses": {"project": "50"}
        }"#;

        let input: CompensationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.period, Period { month: 3, year: 2024 });
        assert_eq!(input.bonuses.project, dec("50"));
        assert_eq!(input.overtime_pay, Decimal::ZERO);
    }

    #[test]
    fn test_amounts_lists_every_money_field() {
        let input = CompensationInput::seeded("emp_001", Period { month: 1, year: 2024 }, dec("1"));
        assert_eq!(input.amounts().len(), 3 + 4 + 3 + 3 + 5);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CompensationStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
