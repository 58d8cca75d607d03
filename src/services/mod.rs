//! Write paths for every record kind.
//!
//! Each service validates its input, runs the pure derivation from
//! [`crate::calculation`] immediately before persistence, and writes through
//! the [`RecordStore`](crate::store::RecordStore). Uniqueness is left to the
//! store: a [`StoreError::Duplicate`] on insert is the "already exists" signal.

mod attendance;
mod compensation;
mod kpi;
mod leave;
mod payroll;

pub use attendance::{AttendancePatch, AttendanceTracker, BackfillAttendance};
pub use compensation::{CompensationPatch, SalaryLedger};
pub use kpi::{KpiScorer, NewReview};
pub use leave::{LeaveCalculator, LeavePatch, NewLeave};
pub use payroll::{PayrollBatchRunner, PayrollFailure, PayrollReport};

use crate::error::{EngineError, EngineResult};
use crate::store::StoreError;

/// Rejects blank employee references.
fn require_employee_id(employee_id: &str) -> EngineResult<()> {
    if employee_id.trim().is_empty() {
        return Err(EngineError::validation("employee_id", "must not be empty"));
    }
    Ok(())
}

/// Converts a store error, replacing the generic duplicate message.
fn duplicate_as(error: StoreError, entity: &str, message: impl FnOnce() -> String) -> EngineError {
    match error {
        StoreError::Duplicate { .. } => EngineError::conflict(entity, message()),
        other => other.into(),
    }
}
