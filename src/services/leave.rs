//! Leave request write paths.

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_leave_days;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, LeaveAdjustment, LeaveRequest, LeaveStatus, LeaveType};
use crate::store::RecordStore;

use super::require_employee_id;

/// Input for a new leave request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeave {
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A partial edit of a leave request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeavePatch {
    /// New first day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// New last day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// New leave type.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
    /// New reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeavePatch {
    fn touches_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Creates leave requests and keeps their day count in step with their dates.
#[derive(Clone)]
pub struct LeaveCalculator {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl LeaveCalculator {
    /// Creates a calculator over the given store.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a pending request with its day count.
    pub async fn create(&self, request: NewLeave) -> EngineResult<LeaveRequest> {
        require_employee_id(&request.employee_id)?;

        let result = calculate_leave_days(request.start_date, request.end_date);
        let leave = LeaveRequest::new(
            request.employee_id,
            request.leave_type,
            request.start_date,
            request.end_date,
            result.days,
            request.reason,
            self.clock.now(),
        );

        let leave = self.store.insert_leave(leave).await?;
        info!(
            leave_id = %leave.id,
            employee_id = %leave.employee_id,
            leave_type = ?leave.leave_type,
            days = leave.days(),
            "Leave request created"
        );
        Ok(leave)
    }

    /// Fetches a request.
    pub async fn get(&self, id: Uuid) -> EngineResult<LeaveRequest> {
        self.store
            .get_leave(id)
            .await?
            .ok_or_else(|| EngineError::not_found("leave request", id))
    }

    /// Edits a request.
    ///
    /// Date edits recompute the day count. Once the request is decided only
    /// hr or admin may change its dates, and each such change is recorded as a
    /// [`LeaveAdjustment`].
    pub async fn update(&self, id: Uuid, actor: &Actor, patch: LeavePatch) -> EngineResult<LeaveRequest> {
        let mut leave = self.get(id).await?;
        let now = self.clock.now();

        if patch.touches_dates() {
            if leave.is_decided() && !actor.role.is_privileged() {
                return Err(EngineError::conflict(
                    "leave request",
                    format!("request {} is {:?} and its dates are frozen", id, leave.status),
                ));
            }

            let start_date = patch.start_date.unwrap_or(leave.start_date);
            let end_date = patch.end_date.unwrap_or(leave.end_date);
            let result = calculate_leave_days(start_date, end_date);
            let previous_days = leave.days();

            if leave.is_decided() {
                warn!(
                    leave_id = %leave.id,
                    actor = %actor.label(),
                    previous_days,
                    new_days = result.days,
                    "Adjusting dates of a decided leave request"
                );
                leave.adjustments.push(LeaveAdjustment {
                    actor_id: actor.label(),
                    previous_days,
                    new_days: result.days,
                    at: now,
                    audit_step: result.audit_step,
                });
            }
            leave.set_dates(start_date, end_date, result.days);
        }

        if let Some(leave_type) = patch.leave_type {
            leave.leave_type = leave_type;
        }
        if patch.reason.is_some() {
            leave.reason = patch.reason;
        }
        leave.updated_at = now;

        let leave = self.store.update_leave(leave).await?;
        info!(leave_id = %leave.id, days = leave.days(), "Leave request updated");
        Ok(leave)
    }

    /// Approves or rejects a pending request.
    pub async fn decide(&self, id: Uuid, actor: &Actor, decision: LeaveStatus) -> EngineResult<LeaveRequest> {
        if decision == LeaveStatus::Pending {
            return Err(EngineError::validation(
                "status",
                "decision must be approved or rejected",
            ));
        }

        let mut leave = self.get(id).await?;
        if leave.is_decided() {
            return Err(EngineError::conflict(
                "leave request",
                format!("request {} was already {:?}", id, leave.status),
            ));
        }

        let now = self.clock.now();
        leave.status = decision;
        leave.decided_by = Some(actor.label());
        leave.decided_at = Some(now);
        leave.updated_at = now;

        let leave = self.store.update_leave(leave).await?;
        info!(
            leave_id = %leave.id,
            status = ?leave.status,
            decided_by = %actor.label(),
            "Leave request decided"
        );
        Ok(leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn calculator() -> LeaveCalculator {
        let now = NaiveDateTime::parse_from_str("2024-01-02 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        LeaveCalculator::new(Arc::new(MemoryStore::new()), Arc::new(FixedClock::new(now)))
    }

    fn request(start: &str, end: &str) -> NewLeave {
        NewLeave {
            employee_id: "emp_001".to_string(),
            leave_type: LeaveType::Annual,
            start_date: date(start),
            end_date: date(end),
            reason: Some("family trip".to_string()),
        }
    }

    fn employee() -> Actor {
        Actor::new("emp_001", Role::Employee)
    }

    fn dates(start: &str, end: &str) -> LeavePatch {
        LeavePatch {
            start_date: Some(date(start)),
            end_date: Some(date(end)),
            ..LeavePatch::default()
        }
    }

    #[tokio::test]
    async fn test_create_counts_both_ends() {
        let leave = calculator().create(request("2024-01-10", "2024-01-12")).await.unwrap();
        assert_eq!(leave.days(), 3);
        assert_eq!(leave.status, LeaveStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_date_edit_recomputes() {
        let calculator = calculator();
        let leave = calculator.create(request("2024-01-10", "2024-01-12")).await.unwrap();

        let patch = LeavePatch {
            end_date: Some(date("2024-01-19")),
            ..LeavePatch::default()
        };
        let updated = calculator.update(leave.id, &employee(), patch).await.unwrap();
        assert_eq!(updated.days(), 10);
        assert!(updated.adjustments.is_empty());
    }

    #[tokio::test]
    async fn test_decided_dates_are_frozen_for_employees() {
        let calculator = calculator();
        let leave = calculator.create(request("2024-01-10", "2024-01-12")).await.unwrap();
        let manager = Actor::new("mgr_001", Role::Manager);
        calculator.decide(leave.id, &manager, LeaveStatus::Approved).await.unwrap();

        let result = calculator
            .update(leave.id, &manager, dates("2024-01-10", "2024-01-15"))
            .await;
        assert!(matches!(result, Err(EngineError::Conflict { .. })));

        // Non-date edits are still allowed
        let patch = LeavePatch {
            reason: Some("updated reason".to_string()),
            ..LeavePatch::default()
        };
        let updated = calculator.update(leave.id, &employee(), patch).await.unwrap();
        assert_eq!(updated.days(), 3);
        assert_eq!(updated.reason.as_deref(), Some("updated reason"));
    }

    #[tokio::test]
    async fn test_privileged_edit_after_decision_is_audited() {
        let calculator = calculator();
        let leave = calculator.create(request("2024-01-10", "2024-01-12")).await.unwrap();
        let hr = Actor::new("hr_001", Role::Hr);
        calculator.decide(leave.id, &hr, LeaveStatus::Approved).await.unwrap();

        let updated = calculator
            .update(leave.id, &hr, dates("2024-01-10", "2024-01-11"))
            .await
            .unwrap();
        assert_eq!(updated.days(), 2);
        assert_eq!(updated.status, LeaveStatus::Approved);
        assert_eq!(updated.adjustments.len(), 1);

        let adjustment = &updated.adjustments[0];
        assert_eq!(adjustment.actor_id, "hr_001");
        assert_eq!(adjustment.previous_days, 3);
        assert_eq!(adjustment.new_days, 2);
        assert_eq!(adjustment.audit_step.rule_id, "leave_day_count");
    }

    #[tokio::test]
    async fn test_decide_stamps_decider_once() {
        let calculator = calculator();
        let leave = calculator.create(request("2024-01-10", "2024-01-10")).await.unwrap();
        let manager = Actor::new("mgr_001", Role::Manager);

        let rejected = calculator.decide(leave.id, &manager, LeaveStatus::Rejected).await.unwrap();
        assert_eq!(rejected.decided_by.as_deref(), Some("mgr_001"));
        assert!(rejected.decided_at.is_some());

        let again = calculator.decide(leave.id, &manager, LeaveStatus::Approved).await;
        assert!(matches!(again, Err(EngineError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_pending_is_not_a_decision() {
        let calculator = calculator();
        let leave = calculator.create(request("2024-01-10", "2024-01-10")).await.unwrap();
        let result = calculator.decide(leave.id, &employee(), LeaveStatus::Pending).await;
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }
}
