//! Record persistence.
//!
//! [`RecordStore`] is the seam between the services and whatever document
//! store backs them. Implementations must enforce the uniqueness
//! constraints themselves, atomically with the write:
//!
//! - one compensation record per (employee, month, year)
//! - one attendance record per (employee, date)
//!
//! A violating insert or update fails with [`StoreError::Duplicate`]; the
//! services treat that as the canonical "already exists" signal instead of
//! relying on a prior read.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AttendanceRecord, CompensationRecord, LeaveRequest, PerformanceReview, Period};

pub use memory::MemoryStore;

/// Errors reported by a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate key: {key}")]
    Duplicate {
        /// Description of the conflicting key.
        key: String,
    },

    /// An update targeted a record that does not exist.
    #[error("record {id} does not exist")]
    Missing {
        /// The missing record id.
        id: Uuid,
    },

    /// The backing store failed.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate { key } => {
                EngineError::conflict("record", format!("a record already exists for {}", key))
            }
            StoreError::Missing { id } => EngineError::not_found("record", id),
            StoreError::Unavailable { message } => EngineError::Storage { message },
        }
    }
}

/// Persistence for every record kind the engine writes.
///
/// Updates replace the whole record; concurrent updates are last-write-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a compensation record, enforcing (employee, period) uniqueness.
    async fn insert_compensation(&self, record: CompensationRecord) -> StoreResult<CompensationRecord>;
    /// Replaces a compensation record, re-checking (employee, period) uniqueness.
    async fn update_compensation(&self, record: CompensationRecord) -> StoreResult<CompensationRecord>;
    /// Fetches a compensation record by id.
    async fn get_compensation(&self, id: Uuid) -> StoreResult<Option<CompensationRecord>>;
    /// Fetches the compensation record for an employee and period.
    async fn find_compensation(
        &self,
        employee_id: &str,
        period: Period,
    ) -> StoreResult<Option<CompensationRecord>>;

    /// Inserts an attendance record, enforcing (employee, date) uniqueness.
    async fn insert_attendance(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord>;
    /// Replaces an attendance record, re-checking (employee, date) uniqueness.
    async fn update_attendance(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord>;
    /// Fetches an attendance record by id.
    async fn get_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>>;
    /// Fetches the attendance record for an employee and day.
    async fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Inserts a performance review.
    async fn insert_review(&self, review: PerformanceReview) -> StoreResult<PerformanceReview>;
    /// Replaces a performance review.
    async fn update_review(&self, review: PerformanceReview) -> StoreResult<PerformanceReview>;
    /// Fetches a performance review by id.
    async fn get_review(&self, id: Uuid) -> StoreResult<Option<PerformanceReview>>;

    /// Inserts a leave request.
    async fn insert_leave(&self, request: LeaveRequest) -> StoreResult<LeaveRequest>;
    /// Replaces a leave request.
    async fn update_leave(&self, request: LeaveRequest) -> StoreResult<LeaveRequest>;
    /// Fetches a leave request by id.
    async fn get_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let error: EngineError = StoreError::Duplicate {
            key: "emp_001/2024-01".to_string(),
        }
        .into();
        assert!(matches!(error, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_missing_maps_to_not_found() {
        let error: EngineError = StoreError::Missing { id: Uuid::nil() }.into();
        assert!(matches!(error, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_unavailable_maps_to_storage() {
        let error: EngineError = StoreError::Unavailable {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Storage error: disk full");
    }
}
