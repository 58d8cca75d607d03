//! Leave request model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuditStep;

/// Kind of leave requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Personal leave.
    Personal,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Unpaid leave.
    Unpaid,
}

/// Decision state of a leave request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision; dates may change.
    #[default]
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
}

/// A privileged change to the day count of a decided request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAdjustment {
    /// Who made the change.
    pub actor_id: String,
    /// Day count before the change.
    pub previous_days: u32,
    /// Day count after the change.
    pub new_days: u32,
    /// When the change was made.
    pub at: NaiveDateTime,
    /// The derivation that produced `new_days`.
    pub audit_step: AuditStep,
}

/// An employee's leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request identifier.
    pub id: Uuid,
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    days: u32,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
    /// Decision state.
    pub status: LeaveStatus,
    /// Who approved or rejected the request.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When the decision was made.
    #[serde(default)]
    pub decided_at: Option<NaiveDateTime>,
    /// Privileged adjustments made after the decision.
    #[serde(default)]
    pub adjustments: Vec<LeaveAdjustment>,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

impl LeaveRequest {
    /// Builds a pending request with its computed day count.
    pub fn new(
        employee_id: impl Into<String>,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days: u32,
        reason: Option<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            leave_type,
            start_date,
            end_date,
            days,
            reason,
            status: LeaveStatus::Pending,
            decided_by: None,
            decided_at: None,
            adjustments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the date range and stores the day count derived from it.
    pub fn set_dates(&mut self, start_date: NaiveDate, end_date: NaiveDate, days: u32) {
        self.start_date = start_date;
        self.end_date = end_date;
        self.days = days;
    }

    /// Derived inclusive day count.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Returns true once approved or rejected.
    pub fn is_decided(&self) -> bool {
        self.status != LeaveStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let request = LeaveRequest::new(
            "emp_001",
            LeaveType::Annual,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            3,
            None,
            now,
        );
        assert_eq!(request.status, LeaveStatus::Pending);
        assert!(!request.is_decided());
        assert_eq!(request.days(), 3);
    }

    #[test]
    fn test_leave_type_serialization() {
        assert_eq!(serde_json::to_string(&LeaveType::Sick).unwrap(), "\"sick\"");
        assert_eq!(
            serde_json::from_str::<LeaveStatus>("\"rejected\"").unwrap(),
            LeaveStatus::Rejected
        );
    }
}
