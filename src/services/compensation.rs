//! Compensation record write paths.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::calculate_salary;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowances, Bonuses, CompensationInput, CompensationRecord, CompensationStatus, Deductions,
    Penalties,
};
use crate::store::RecordStore;

use super::duplicate_as;

/// A partial edit of a compensation record.
///
/// Bundles are replaced whole when present. Gross and net salary are not
/// editable; they are re-derived from the patched inputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompensationPatch {
    /// New month.
    #[serde(default)]
    pub month: Option<u32>,
    /// New year.
    #[serde(default)]
    pub year: Option<i32>,
    /// New base salary.
    #[serde(default)]
    pub base_salary: Option<Decimal>,
    /// Replacement allowance bundle.
    #[serde(default)]
    pub allowances: Option<Allowances>,
    /// Replacement bonus bundle.
    #[serde(default)]
    pub bonuses: Option<Bonuses>,
    /// Replacement penalty bundle.
    #[serde(default)]
    pub penalties: Option<Penalties>,
    /// New overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// New overtime pay.
    #[serde(default)]
    pub overtime_pay: Option<Decimal>,
    /// Replacement deduction bundle.
    #[serde(default)]
    pub deductions: Option<Deductions>,
}

impl CompensationPatch {
    fn apply_to(self, inputs: &mut CompensationInput) {
        if let Some(month) = self.month {
            inputs.period.month = month;
        }
        if let Some(year) = self.year {
            inputs.period.year = year;
        }
        if let Some(base_salary) = self.base_salary {
            inputs.base_salary = base_salary;
        }
        if let Some(allowances) = self.allowances {
            inputs.allowances = allowances;
        }
        if let Some(bonuses) = self.bonuses {
            inputs.bonuses = bonuses;
        }
        if let Some(penalties) = self.penalties {
            inputs.penalties = penalties;
        }
        if let Some(overtime_hours) = self.overtime_hours {
            inputs.overtime_hours = overtime_hours;
        }
        if let Some(overtime_pay) = self.overtime_pay {
            inputs.overtime_pay = overtime_pay;
        }
        if let Some(deductions) = self.deductions {
            inputs.deductions = deductions;
        }
    }
}

/// Creates and maintains compensation records.
#[derive(Clone)]
pub struct SalaryLedger {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl SalaryLedger {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a pending record; one per employee and period.
    pub async fn create(&self, inputs: CompensationInput) -> EngineResult<CompensationRecord> {
        let breakdown = calculate_salary(&inputs)?;
        let record = CompensationRecord::new(inputs, &breakdown, self.clock.now());
        let (employee_id, period) = record.period_key();

        let record = self
            .store
            .insert_compensation(record)
            .await
            .map_err(|e| {
                duplicate_as(e, "compensation", || {
                    format!("{} already has a record for {}", employee_id, period)
                })
            })?;

        info!(
            record_id = %record.id,
            employee_id = %record.inputs.employee_id,
            period = %record.inputs.period,
            gross_salary = %record.gross_salary(),
            net_salary = %record.net_salary(),
            "Compensation record created"
        );
        debug!(reasoning = %breakdown.audit_step.reasoning, "Salary derivation");

        Ok(record)
    }

    /// Fetches a record.
    pub async fn get(&self, id: Uuid) -> EngineResult<CompensationRecord> {
        self.store
            .get_compensation(id)
            .await?
            .ok_or_else(|| EngineError::not_found("compensation", id))
    }

    /// Applies a partial edit and re-derives gross and net salary.
    ///
    /// Paid and cancelled records are frozen.
    pub async fn update(&self, id: Uuid, patch: CompensationPatch) -> EngineResult<CompensationRecord> {
        let mut record = self.get(id).await?;
        if record.status != CompensationStatus::Pending {
            return Err(EngineError::conflict(
                "compensation",
                format!("record {} is {:?} and can no longer be edited", id, record.status),
            ));
        }

        patch.apply_to(&mut record.inputs);
        let breakdown = calculate_salary(&record.inputs)?;
        record.apply_breakdown(&breakdown);
        record.updated_at = self.clock.now();

        let (employee_id, period) = record.period_key();
        let record = self
            .store
            .update_compensation(record)
            .await
            .map_err(|e| {
                duplicate_as(e, "compensation", || {
                    format!("{} already has a record for {}", employee_id, period)
                })
            })?;

        info!(
            record_id = %record.id,
            net_salary = %record.net_salary(),
            "Compensation record updated"
        );
        Ok(record)
    }

    /// Marks a pending record as paid, stamping the payment date.
    ///
    /// Without an explicit date, today's date is used.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payment_date: Option<NaiveDate>,
    ) -> EngineResult<CompensationRecord> {
        let mut record = self.get(id).await?;
        if record.status != CompensationStatus::Pending {
            return Err(EngineError::conflict(
                "compensation",
                format!("only pending records can be paid, record {} is {:?}", id, record.status),
            ));
        }

        let now = self.clock.now();
        record.status = CompensationStatus::Paid;
        record.payment_date = Some(payment_date.unwrap_or(now.date()));
        record.updated_at = now;

        let record = self.store.update_compensation(record).await?;
        info!(record_id = %record.id, payment_date = ?record.payment_date, "Compensation record paid");
        Ok(record)
    }

    /// Cancels a pending record.
    pub async fn cancel(&self, id: Uuid) -> EngineResult<CompensationRecord> {
        let mut record = self.get(id).await?;
        if record.status != CompensationStatus::Pending {
            return Err(EngineError::conflict(
                "compensation",
                format!("only pending records can be cancelled, record {} is {:?}", id, record.status),
            ));
        }

        record.status = CompensationStatus::Cancelled;
        record.updated_at = self.clock.now();

        let record = self.store.update_compensation(record).await?;
        info!(record_id = %record.id, "Compensation record cancelled");
        Ok(record)
    }
}
