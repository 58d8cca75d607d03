//! Attendance classification and worked-hour derivation.
//!
//! Check-in is classified against the daily cutoff; check-out derives
//! worked hours (rounded to two decimals), overtime beyond the standard
//! day, and the final status. A short day is always a half-day, whatever
//! the check-in classification was. Overtime hours never change the
//! status on their own; `overtime` is only ever set by a back-fill edit.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceStatus, AuditStep};

const SECONDS_PER_HOUR: i64 = 3600;

/// The result of closing an attendance day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursResult {
    /// Worked hours, rounded to two decimals.
    pub work_hours: Decimal,
    /// Hours beyond the standard work day.
    pub overtime_hours: Decimal,
    /// Final attendance status.
    pub status: AttendanceStatus,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
}

/// Classifies a check-in as `Late` or `Present`.
///
/// A check-in strictly after the cutoff time is late; one exactly at the
/// cutoff is on time.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::classify_check_in;
/// use workforce_engine::config::AttendancePolicy;
/// use workforce_engine::models::AttendanceStatus;
/// use chrono::NaiveDateTime;
///
/// let policy = AttendancePolicy::default();
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
///
/// assert_eq!(classify_check_in(at("2024-01-10 09:00:00"), &policy), AttendanceStatus::Present);
/// assert_eq!(classify_check_in(at("2024-01-10 09:15:00"), &policy), AttendanceStatus::Late);
/// ```
pub fn classify_check_in(check_in: NaiveDateTime, policy: &AttendancePolicy) -> AttendanceStatus {
    if check_in.time() > policy.late_cutoff {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Rounds to two decimal places, halves away from zero.
fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives worked hours, overtime and final status for a closed day.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `check_out` precedes `check_in`.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::calculate_work_hours;
/// use workforce_engine::config::AttendancePolicy;
/// use workforce_engine::models::AttendanceStatus;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let result = calculate_work_hours(
///     at("2024-01-10 09:00:00"),
///     at("2024-01-10 17:30:00"),
///     &AttendancePolicy::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.work_hours, Decimal::new(85, 1));
/// assert_eq!(result.overtime_hours, Decimal::new(5, 1));
/// assert_eq!(result.status, AttendanceStatus::Present);
/// ```
pub fn calculate_work_hours(
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    policy: &AttendancePolicy,
) -> EngineResult<WorkHoursResult> {
    let elapsed_seconds = (check_out - check_in).num_seconds();
    if elapsed_seconds < 0 {
        return Err(EngineError::validation(
            "check_out",
            format!("check-out {} is before check-in {}", check_out, check_in),
        ));
    }

    let work_hours = round_hours(Decimal::from(elapsed_seconds) / Decimal::from(SECONDS_PER_HOUR));
    let overtime_hours = if work_hours > policy.standard_work_hours {
        work_hours - policy.standard_work_hours
    } else {
        Decimal::ZERO
    };

    let check_in_status = classify_check_in(check_in, policy);
    let (status, reasoning) = if work_hours < policy.half_day_threshold_hours {
        (
            AttendanceStatus::HalfDay,
            format!(
                "{} hours worked is under the {} hour threshold, marking half-day",
                work_hours.normalize(),
                policy.half_day_threshold_hours.normalize()
            ),
        )
    } else {
        (
            check_in_status,
            format!(
                "{} hours worked, keeping check-in classification {:?}",
                work_hours.normalize(),
                check_in_status
            ),
        )
    };

    let audit_step = AuditStep {
        rule_id: "work_hours_derivation".to_string(),
        rule_name: "Work Hours Derivation".to_string(),
        formula: "work_hours = round((check_out - check_in) / 1h, 2)".to_string(),
        input: serde_json::json!({
            "check_in": check_in.to_string(),
            "check_out": check_out.to_string(),
            "late_cutoff": policy.late_cutoff.to_string(),
            "half_day_threshold_hours": policy.half_day_threshold_hours.normalize().to_string(),
            "standard_work_hours": policy.standard_work_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "work_hours": work_hours.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "status": status
        }),
        reasoning,
    };

    Ok(WorkHoursResult {
        work_hours,
        overtime_hours,
        status,
        audit_step,
    })
}
