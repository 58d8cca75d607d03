//! Application state for the Workforce Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::directory::{EmployeeDirectory, StaticDirectory, TimeoutDirectory};
use crate::services::{AttendanceTracker, KpiScorer, LeaveCalculator, PayrollBatchRunner, SalaryLedger};
use crate::store::{MemoryStore, RecordStore};

/// Shared application state.
///
/// Every service holds its collaborators behind `Arc`, so cloning the
/// state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    directory: Arc<dyn EmployeeDirectory>,
    compensation: SalaryLedger,
    attendance: AttendanceTracker,
    kpi: KpiScorer,
    leave: LeaveCalculator,
    payroll: PayrollBatchRunner,
}

impl AppState {
    /// Wires the services over explicit collaborators.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let attendance = AttendanceTracker::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.attendance().clone(),
        );
        Self {
            compensation: SalaryLedger::new(Arc::clone(&store), Arc::clone(&clock)),
            kpi: KpiScorer::new(Arc::clone(&store), Arc::clone(&clock)),
            leave: LeaveCalculator::new(Arc::clone(&store), Arc::clone(&clock)),
            payroll: PayrollBatchRunner::new(store, Arc::clone(&directory), clock),
            attendance,
            directory,
            config: Arc::new(config),
        }
    }

    /// Default wiring: in-memory store, the configured roster as directory
    /// bounded by the configured timeout, and the system clock.
    pub fn from_config(config: EngineConfig) -> Self {
        let directory = TimeoutDirectory::new(
            StaticDirectory::new(config.roster().to_vec()),
            Duration::from_millis(config.directory().timeout_ms),
        );
        Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(directory),
            Arc::new(SystemClock),
        )
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the employee directory used for enrichment.
    pub fn directory(&self) -> &dyn EmployeeDirectory {
        self.directory.as_ref()
    }

    /// Compensation write paths.
    pub fn compensation(&self) -> &SalaryLedger {
        &self.compensation
    }

    /// Attendance write paths.
    pub fn attendance(&self) -> &AttendanceTracker {
        &self.attendance
    }

    /// Performance review write paths.
    pub fn kpi(&self) -> &KpiScorer {
        &self.kpi
    }

    /// Leave request write paths.
    pub fn leave(&self) -> &LeaveCalculator {
        &self.leave
    }

    /// The payroll batch.
    pub fn payroll(&self) -> &PayrollBatchRunner {
        &self.payroll
    }
}
