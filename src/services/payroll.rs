//! Monthly payroll batch.
//!
//! For each active employee the batch seeds a pending compensation record
//! from the employee's base salary, to be completed later by payroll staff.
//! Existing records are detected by the store's (employee, period)
//! constraint on insert, so re-running a period creates nothing new even
//! when two runs overlap.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::calculation::calculate_salary;
use crate::clock::Clock;
use crate::directory::EmployeeDirectory;
use crate::error::EngineResult;
use crate::models::{CompensationInput, CompensationRecord, Period};
use crate::store::{RecordStore, StoreError};

/// An employee the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayrollFailure {
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Why the record was not created.
    pub message: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollReport {
    /// The processed period.
    #[serde(flatten)]
    pub period: Period,
    /// Number of newly created records.
    pub created_count: usize,
    /// Number of employees that already had a record.
    pub skipped_count: usize,
    /// The newly created records.
    pub records: Vec<CompensationRecord>,
    /// Employees that failed; the rest of the roster still ran.
    pub failures: Vec<PayrollFailure>,
}

/// Runs the payroll batch across the active roster.
#[derive(Clone)]
pub struct PayrollBatchRunner {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn EmployeeDirectory>,
    clock: Arc<dyn Clock>,
}

impl PayrollBatchRunner {
    /// Creates a runner.
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Seeds missing compensation records for `period`.
    ///
    /// # Errors
    ///
    /// Fails with a validation error for an invalid period and with
    /// [`EngineError::DirectoryUnavailable`](crate::error::EngineError::DirectoryUnavailable)
    /// if the roster cannot be fetched. Per-employee failures are reported in
    /// the result instead.
    pub async fn run(&self, period: Period) -> EngineResult<PayrollReport> {
        period.validate()?;
        let roster = self.directory.active_roster().await?;
        info!(period = %period, roster_size = roster.len(), "Payroll batch started");

        let mut report = PayrollReport {
            period,
            created_count: 0,
            skipped_count: 0,
            records: Vec::new(),
            failures: Vec::new(),
        };

        for entry in roster {
            let inputs = CompensationInput::seeded(entry.employee_id.clone(), period, entry.base_salary);
            let breakdown = match calculate_salary(&inputs) {
                Ok(breakdown) => breakdown,
                Err(err) => {
                    warn!(employee_id = %entry.employee_id, error = %err, "Payroll seed rejected");
                    report.failures.push(PayrollFailure {
                        employee_id: entry.employee_id,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let record = CompensationRecord::new(inputs, &breakdown, self.clock.now());
            match self.store.insert_compensation(record).await {
                Ok(record) => {
                    report.created_count += 1;
                    report.records.push(record);
                }
                Err(StoreError::Duplicate { .. }) => {
                    report.skipped_count += 1;
                }
                Err(err) => {
                    warn!(employee_id = %entry.employee_id, error = %err, "Payroll insert failed");
                    report.failures.push(PayrollFailure {
                        employee_id: entry.employee_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            period = %period,
            created = report.created_count,
            skipped = report.skipped_count,
            failed = report.failures.len(),
            "Payroll batch finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::directory::{DirectoryError, StaticDirectory};
    use crate::error::EngineError;
    use crate::models::{
        CompensationStatus, DirectoryEntry, EmployeeProfile, RosterEntry,
    };
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn entry(id: &str, salary: i64, active: bool) -> DirectoryEntry {
        DirectoryEntry {
            id: id.to_string(),
            profile: EmployeeProfile {
                first_name: id.to_string(),
                last_name: "Test".to_string(),
                email: format!("{}@example.com", id),
                employee_id: id.to_uppercase(),
                department: "Finance".to_string(),
                position: "Clerk".to_string(),
            },
            base_salary: Decimal::from(salary),
            active,
        }
    }

    fn runner_with(store: Arc<MemoryStore>, directory: Arc<dyn EmployeeDirectory>) -> PayrollBatchRunner {
        let now = NaiveDateTime::parse_from_str("2024-01-31 18:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        PayrollBatchRunner::new(store, directory, Arc::new(FixedClock::new(now)))
    }

    fn roster() -> Arc<dyn EmployeeDirectory> {
        Arc::new(StaticDirectory::new(vec![
            entry("emp_001", 5000, true),
            entry("emp_002", 6000, true),
            entry("emp_003", 7000, false),
        ]))
    }

    #[tokio::test]
    async fn test_run_seeds_active_employees() {
        let store = Arc::new(MemoryStore::new());
        let report = runner_with(store.clone(), roster())
            .run(Period { month: 1, year: 2024 })
            .await
            .unwrap();

        assert_eq!(report.created_count, 2);
        assert_eq!(report.skipped_count, 0);
        assert!(report.failures.is_empty());

        let record = &report.records[0];
        assert_eq!(record.inputs.employee_id, "emp_001");
        assert_eq!(record.net_salary(), Decimal::from(5000));
        assert_eq!(record.status, CompensationStatus::Pending);

        let inactive = store
            .find_compensation("emp_003", Period { month: 1, year: 2024 })
            .await
            .unwrap();
        assert!(inactive.is_none());
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let runner = runner_with(Arc::new(MemoryStore::new()), roster());
        let period = Period { month: 2, year: 2024 };

        runner.run(period).await.unwrap();
        let second = runner.run(period).await.unwrap();

        assert_eq!(second.created_count, 0);
        assert_eq!(second.skipped_count, 2);
        assert!(second.records.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_runs_create_each_record_once() {
        let runner = runner_with(Arc::new(MemoryStore::new()), roster());
        let period = Period { month: 3, year: 2024 };

        let (a, b) = tokio::join!(runner.run(period), runner.run(period));
        let created = a.unwrap().created_count + b.unwrap().created_count;
        assert_eq!(created, 2);
    }

    #[tokio::test]
    async fn test_bad_roster_entry_does_not_abort_batch() {
        let directory = Arc::new(StaticDirectory::new(vec![
            entry("emp_001", -10, true),
            entry("emp_002", 6000, true),
        ]));
        let report = runner_with(Arc::new(MemoryStore::new()), directory)
            .run(Period { month: 1, year: 2024 })
            .await
            .unwrap();

        assert_eq!(report.created_count, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].employee_id, "emp_001");
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let result = runner_with(Arc::new(MemoryStore::new()), roster())
            .run(Period { month: 13, year: 2024 })
            .await;
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    struct DownDirectory;

    #[async_trait]
    impl EmployeeDirectory for DownDirectory {
        async fn batch_lookup(
            &self,
            _ids: &[String],
        ) -> Result<HashMap<String, EmployeeProfile>, DirectoryError> {
            Err(DirectoryError::Unavailable {
                message: "down".to_string(),
            })
        }

        async fn active_roster(&self) -> Result<Vec<RosterEntry>, DirectoryError> {
            Err(DirectoryError::Unavailable {
                message: "down".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_directory_down_fails_the_batch() {
        let result = runner_with(Arc::new(MemoryStore::new()), Arc::new(DownDirectory))
            .run(Period { month: 1, year: 2024 })
            .await;
        assert!(matches!(result, Err(EngineError::DirectoryUnavailable { .. })));
    }
}
