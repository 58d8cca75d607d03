//! Attendance record model.
//!
//! An [`AttendanceRecord`] is created open on check-in and closed exactly
//! once on check-out. Worked hours, overtime hours and the final status are
//! derived, so like compensation figures they are only written through
//! [`AttendanceRecord::apply_derivation`].

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::WorkHoursResult;

/// Attendance classification for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Checked in on time.
    Present,
    /// Checked in after the daily cutoff.
    Late,
    /// Worked fewer hours than the half-day threshold.
    HalfDay,
    /// No attendance.
    Absent,
    /// Recorded as an overtime day by a back-fill edit.
    Overtime,
}

/// One employee's attendance for one calendar day.
///
/// # Example
///
/// ```
/// use workforce_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDateTime;
///
/// let check_in = NaiveDateTime::parse_from_str("2024-01-10 08:55:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let record = AttendanceRecord::open("emp_001", check_in, AttendanceStatus::Present);
/// assert!(record.is_open());
/// assert_eq!(record.date, check_in.date());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Employee reference in the directory.
    pub employee_id: String,
    /// The calendar day this record covers.
    pub date: NaiveDate,
    /// Check-in instant.
    pub check_in: NaiveDateTime,
    /// Check-out instant; unset while the day is open.
    pub check_out: Option<NaiveDateTime>,
    /// Attendance status.
    pub status: AttendanceStatus,
    work_hours: Decimal,
    overtime_hours: Decimal,
    /// Free-text note, usually set by back-fill edits.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Opens a record for the day of `check_in`.
    pub fn open(employee_id: impl Into<String>, check_in: NaiveDateTime, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            date: check_in.date(),
            check_in,
            check_out: None,
            status,
            work_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            notes: None,
        }
    }

    /// Returns true while no check-out has been recorded.
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Writes derived hours and status from a completed derivation.
    pub fn apply_derivation(&mut self, result: &WorkHoursResult) {
        self.work_hours = result.work_hours;
        self.overtime_hours = result.overtime_hours;
        self.status = result.status;
    }

    /// Clears derived hours, used when a back-fill edit removes the check-out.
    pub fn clear_derivation(&mut self) {
        self.work_hours = Decimal::ZERO;
        self.overtime_hours = Decimal::ZERO;
    }

    /// Derived worked hours, rounded to two decimals.
    pub fn work_hours(&self) -> Decimal {
        self.work_hours
    }

    /// Derived overtime hours.
    pub fn overtime_hours(&self) -> Decimal {
        self.overtime_hours
    }

    /// The store's uniqueness key: one record per employee and day.
    pub fn day_key(&self) -> (String, NaiveDate) {
        (self.employee_id.clone(), self.date)
    }
}
