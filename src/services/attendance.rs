//! Attendance check-in/check-out state machine and back-fill edits.
//!
//! Per (employee, date) a record moves from absent (no record) to open on
//! check-in and to closed on check-out. Closed records only change through
//! privileged back-fill edits.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{calculate_work_hours, classify_check_in};
use crate::clock::Clock;
use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, AttendanceRecord, AttendanceStatus};
use crate::store::RecordStore;

use super::{duplicate_as, require_employee_id};

/// A privileged back-fill of a whole attendance day.
#[derive(Debug, Clone, Deserialize)]
pub struct BackfillAttendance {
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Check-in instant; its date is the record's day.
    pub check_in: NaiveDateTime,
    /// Optional check-out instant.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    /// Explicit status, used while the record stays open.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Free-text note.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A privileged edit of an existing attendance record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendancePatch {
    /// New check-in instant; moves the record to that day.
    #[serde(default)]
    pub check_in: Option<NaiveDateTime>,
    /// New check-out instant.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    /// Removes the check-out, reopening the day.
    #[serde(default)]
    pub clear_check_out: bool,
    /// Explicit status.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Free-text note.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Records check-ins and check-outs and derives worked hours.
#[derive(Clone)]
pub struct AttendanceTracker {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    policy: AttendancePolicy,
}

impl AttendanceTracker {
    /// Creates a tracker applying `policy`.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, policy: AttendancePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Opens today's record for an employee.
    ///
    /// Fails with a conflict if a record already exists for the day.
    pub async fn check_in(&self, employee_id: &str) -> EngineResult<AttendanceRecord> {
        require_employee_id(employee_id)?;

        let now = self.clock.now();
        let status = classify_check_in(now, &self.policy);
        let record = AttendanceRecord::open(employee_id, now, status);

        let record = self.store.insert_attendance(record).await.map_err(|e| {
            duplicate_as(e, "attendance", || {
                format!("{} already checked in on {}", employee_id, now.date())
            })
        })?;

        info!(
            record_id = %record.id,
            employee_id = %employee_id,
            check_in = %record.check_in,
            status = ?record.status,
            "Checked in"
        );
        Ok(record)
    }

    /// Closes today's open record and derives hours and final status.
    pub async fn check_out(&self, employee_id: &str) -> EngineResult<AttendanceRecord> {
        require_employee_id(employee_id)?;

        let now = self.clock.now();
        let mut record = self
            .find_closable(employee_id, now.date())
            .await?
            .ok_or_else(|| {
                EngineError::conflict(
                    "attendance",
                    format!("{} has not checked in on {}", employee_id, now.date()),
                )
            })?;

        if !record.is_open() {
            return Err(EngineError::conflict(
                "attendance",
                format!("{} already checked out on {}", employee_id, record.date),
            ));
        }

        let derivation = calculate_work_hours(record.check_in, now, &self.policy)?;
        record.check_out = Some(now);
        record.apply_derivation(&derivation);

        let record = self.store.update_attendance(record).await?;
        info!(
            record_id = %record.id,
            employee_id = %employee_id,
            work_hours = %record.work_hours(),
            overtime_hours = %record.overtime_hours(),
            status = ?record.status,
            "Checked out"
        );
        debug!(reasoning = %derivation.audit_step.reasoning, "Work hours derivation");
        Ok(record)
    }

    /// Today's record, or yesterday's if it is still open (a day that
    /// runs past midnight).
    async fn find_closable(
        &self,
        employee_id: &str,
        today: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        if let Some(record) = self.store.find_attendance(employee_id, today).await? {
            return Ok(Some(record));
        }
        let Some(yesterday) = today.pred_opt() else {
            return Ok(None);
        };
        Ok(self
            .store
            .find_attendance(employee_id, yesterday)
            .await?
            .filter(AttendanceRecord::is_open))
    }

    /// Creates a record for any day on behalf of an employee.
    ///
    /// The (employee, date) uniqueness still applies. When a check-out is
    /// given the derived status replaces any explicit one.
    pub async fn backfill_create(
        &self,
        actor: &Actor,
        request: BackfillAttendance,
    ) -> EngineResult<AttendanceRecord> {
        require_privileged(actor)?;
        require_employee_id(&request.employee_id)?;

        let status = request
            .status
            .unwrap_or_else(|| classify_check_in(request.check_in, &self.policy));
        let mut record = AttendanceRecord::open(&request.employee_id, request.check_in, status);
        record.notes = request.notes;
        if let Some(check_out) = request.check_out {
            let derivation = calculate_work_hours(record.check_in, check_out, &self.policy)?;
            record.check_out = Some(check_out);
            record.apply_derivation(&derivation);
        }

        let (employee_id, date) = record.day_key();
        let record = self.store.insert_attendance(record).await.map_err(|e| {
            duplicate_as(e, "attendance", || {
                format!("{} already has a record for {}", employee_id, date)
            })
        })?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            date = %record.date,
            actor = %actor.label(),
            status = ?record.status,
            "Attendance back-filled"
        );
        Ok(record)
    }

    /// Edits times, status or notes of an existing record.
    ///
    /// Hours and status are re-derived whenever both timestamps are present
    /// after the edit.
    pub async fn backfill_update(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: AttendancePatch,
    ) -> EngineResult<AttendanceRecord> {
        require_privileged(actor)?;

        let mut record = self.get(id).await?;
        let reclassify = patch.status.is_none() && (patch.clear_check_out || patch.check_in.is_some());
        if let Some(check_in) = patch.check_in {
            record.check_in = check_in;
            record.date = check_in.date();
        }
        if patch.clear_check_out {
            record.check_out = None;
            record.clear_derivation();
        } else if let Some(check_out) = patch.check_out {
            record.check_out = Some(check_out);
        }
        if let Some(status) = patch.status {
            record.status = status;
        } else if reclassify && record.is_open() {
            record.status = classify_check_in(record.check_in, &self.policy);
        }
        if patch.notes.is_some() {
            record.notes = patch.notes;
        }

        if let Some(check_out) = record.check_out {
            let derivation = calculate_work_hours(record.check_in, check_out, &self.policy)?;
            record.apply_derivation(&derivation);
        }

        let (employee_id, date) = record.day_key();
        let record = self.store.update_attendance(record).await.map_err(|e| {
            duplicate_as(e, "attendance", || {
                format!("{} already has a record for {}", employee_id, date)
            })
        })?;

        info!(
            record_id = %record.id,
            actor = %actor.label(),
            work_hours = %record.work_hours(),
            status = ?record.status,
            "Attendance edited"
        );
        Ok(record)
    }

    /// Fetches a record.
    pub async fn get(&self, id: Uuid) -> EngineResult<AttendanceRecord> {
        self.store
            .get_attendance(id)
            .await?
            .ok_or_else(|| EngineError::not_found("attendance", id))
    }
}

fn require_privileged(actor: &Actor) -> EngineResult<()> {
    if actor.role.is_privileged() {
        Ok(())
    } else {
        Err(EngineError::forbidden("attendance back-fill"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn tracker(start: &str) -> (AttendanceTracker, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at(start)));
        let tracker = AttendanceTracker::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            AttendancePolicy::default(),
        );
        (tracker, clock)
    }

    fn hr() -> Actor {
        Actor::new("hr_001", Role::Hr)
    }

    #[tokio::test]
    async fn test_full_day_is_present() {
        let (tracker, clock) = tracker("2024-01-10 09:00:00");
        let opened = tracker.check_in("emp_001").await.unwrap();
        assert_eq!(opened.status, AttendanceStatus::Present);

        clock.set(at("2024-01-10 17:30:00"));
        let closed = tracker.check_out("emp_001").await.unwrap();
        assert_eq!(closed.work_hours(), Decimal::new(85, 1));
        assert_eq!(closed.overtime_hours(), Decimal::new(5, 1));
        assert_eq!(closed.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_short_late_day_becomes_half_day() {
        let (tracker, clock) = tracker("2024-01-10 09:15:00");
        let opened = tracker.check_in("emp_001").await.unwrap();
        assert_eq!(opened.status, AttendanceStatus::Late);

        clock.advance(Duration::hours(3));
        let closed = tracker.check_out("emp_001").await.unwrap();
        assert_eq!(closed.work_hours(), Decimal::from(3));
        assert_eq!(closed.status, AttendanceStatus::HalfDay);
    }

    #[tokio::test]
    async fn test_second_check_in_is_a_conflict() {
        let (tracker, clock) = tracker("2024-01-10 08:30:00");
        let first = tracker.check_in("emp_001").await.unwrap();

        clock.set(at("2024-01-10 13:00:00"));
        match tracker.check_in("emp_001").await {
            Err(EngineError::Conflict { message, .. }) => {
                assert_eq!(message, "emp_001 already checked in on 2024-01-10");
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        // The original record is untouched
        let stored = tracker.get(first.id).await.unwrap();
        assert_eq!(stored.check_in, at("2024-01-10 08:30:00"));
    }

    #[tokio::test]
    async fn test_check_out_without_check_in() {
        let (tracker, _) = tracker("2024-01-10 17:00:00");
        let result = tracker.check_out("emp_001").await;
        assert!(matches!(result, Err(EngineError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_second_check_out_is_a_conflict() {
        let (tracker, clock) = tracker("2024-01-10 09:00:00");
        tracker.check_in("emp_001").await.unwrap();
        clock.set(at("2024-01-10 17:00:00"));
        tracker.check_out("emp_001").await.unwrap();

        clock.set(at("2024-01-10 18:00:00"));
        let result = tracker.check_out("emp_001").await;
        assert!(matches!(result, Err(EngineError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_blank_employee_is_rejected() {
        let (tracker, _) = tracker("2024-01-10 09:00:00");
        let result = tracker.check_in("  ").await;
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_backfill_requires_privileged_role() {
        let (tracker, _) = tracker("2024-01-10 09:00:00");
        let request = BackfillAttendance {
            employee_id: "emp_001".to_string(),
            check_in: at("2024-01-05 09:00:00"),
            check_out: None,
            status: None,
            notes: None,
        };

        let result = tracker
            .backfill_create(&Actor::new("mgr_001", Role::Manager), request)
            .await;
        assert!(matches!(result, Err(EngineError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_backfill_create_derives_closed_day() {
        let (tracker, _) = tracker("2024-01-10 09:00:00");
        let request = BackfillAttendance {
            employee_id: "emp_001".to_string(),
            check_in: at("2024-01-05 09:30:00"),
            check_out: Some(at("2024-01-05 12:00:00")),
            status: Some(AttendanceStatus::Present),
            notes: Some("badge reader down".to_string()),
        };

        let record = tracker.backfill_create(&hr(), request).await.unwrap();
        assert_eq!(record.date, at("2024-01-05 00:00:00").date());
        assert_eq!(record.work_hours(), Decimal::new(25, 1));
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[tokio::test]
    async fn test_backfill_update_rederives_and_keeps_explicit_status_while_open() {
        let (tracker, clock) = tracker("2024-01-10 09:00:00");
        let record = tracker.check_in("emp_001").await.unwrap();

        let patch = AttendancePatch {
            status: Some(AttendanceStatus::Overtime),
            ..AttendancePatch::default()
        };
        let open = tracker.backfill_update(&hr(), record.id, patch).await.unwrap();
        assert_eq!(open.status, AttendanceStatus::Overtime);
        assert!(open.is_open());

        clock.set(at("2024-01-10 19:00:00"));
        let patch = AttendancePatch {
            check_out: Some(at("2024-01-10 11:00:00")),
            ..AttendancePatch::default()
        };
        let closed = tracker.backfill_update(&hr(), record.id, patch).await.unwrap();
        assert_eq!(closed.work_hours(), Decimal::from(2));
        assert_eq!(closed.status, AttendanceStatus::HalfDay);

        let patch = AttendancePatch {
            clear_check_out: true,
            ..AttendancePatch::default()
        };
        let reopened = tracker.backfill_update(&hr(), record.id, patch).await.unwrap();
        assert!(reopened.is_open());
        assert_eq!(reopened.work_hours(), Decimal::ZERO);
        assert_eq!(reopened.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_reopening_a_late_day_restores_late() {
        let (tracker, _) = tracker("2024-01-10 09:00:00");
        let request = BackfillAttendance {
            employee_id: "emp_001".to_string(),
            check_in: at("2024-01-05 09:45:00"),
            check_out: Some(at("2024-01-05 11:00:00")),
            status: None,
            notes: None,
        };
        let record = tracker.backfill_create(&hr(), request).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::HalfDay);

        let patch = AttendancePatch {
            clear_check_out: true,
            ..AttendancePatch::default()
        };
        let reopened = tracker.backfill_update(&hr(), record.id, patch).await.unwrap();
        assert_eq!(reopened.status, AttendanceStatus::Late);
    }

    #[tokio::test]
    async fn test_check_out_after_midnight_closes_previous_day() {
        let (tracker, clock) = tracker("2024-01-10 22:00:00");
        let opened = tracker.check_in("emp_001").await.unwrap();

        clock.set(at("2024-01-11 06:00:00"));
        let closed = tracker.check_out("emp_001").await.unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.date, at("2024-01-10 00:00:00").date());
        assert_eq!(closed.work_hours(), Decimal::from(8));
        assert_eq!(closed.status, AttendanceStatus::Late);
    }

    #[tokio::test]
    async fn test_closed_previous_day_is_not_closed_again() {
        let (tracker, clock) = tracker("2024-01-10 09:00:00");
        tracker.check_in("emp_001").await.unwrap();
        clock.set(at("2024-01-10 17:00:00"));
        tracker.check_out("emp_001").await.unwrap();

        clock.set(at("2024-01-11 08:00:00"));
        match tracker.check_out("emp_001").await {
            Err(EngineError::Conflict { message, .. }) => {
                assert_eq!(message, "emp_001 has not checked in on 2024-01-11");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backfill_update_check_out_before_check_in() {
        let (tracker, _) = tracker("2024-01-10 09:00:00");
        let record = tracker.check_in("emp_001").await.unwrap();

        let patch = AttendancePatch {
            check_out: Some(at("2024-01-10 08:00:00")),
            ..AttendancePatch::default()
        };
        match tracker.backfill_update(&hr(), record.id, patch).await {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "check_out"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
