//! Leave day counting.
//!
//! A leave span counts both boundary days: the absolute distance between
//! the two dates, rounded up to whole days, plus one.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// The result of counting the days of a leave span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDaysResult {
    /// Inclusive day count.
    pub days: u32,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
}

/// Counts the inclusive calendar days between two instants.
///
/// ```text
/// days = ceil(|end − start| in ms / 86_400_000) + 1
/// ```
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::span_days;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(span_days(at("2024-01-10 00:00:00"), at("2024-01-12 00:00:00")), 3);
/// assert_eq!(span_days(at("2024-01-10 00:00:00"), at("2024-01-10 12:00:00")), 2);
/// ```
pub fn span_days(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let millis = (end - start).num_milliseconds().abs();
    let whole_days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(whole_days + 1).unwrap_or(u32::MAX)
}

/// Counts the days of a leave request spanning `start_date..=end_date`.
///
/// Dates given in reverse order count the same span.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::calculate_leave_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
/// assert_eq!(calculate_leave_days(start, end).days, 3);
/// ```
pub fn calculate_leave_days(start_date: NaiveDate, end_date: NaiveDate) -> LeaveDaysResult {
    let days = span_days(
        start_date.and_time(chrono::NaiveTime::MIN),
        end_date.and_time(chrono::NaiveTime::MIN),
    );

    let audit_step = AuditStep {
        rule_id: "leave_day_count".to_string(),
        rule_name: "Leave Day Count".to_string(),
        formula: "ceil(|end - start| / 1 day) + 1".to_string(),
        input: serde_json::json!({
            "start_date": start_date.to_string(),
            "end_date": end_date.to_string()
        }),
        output: serde_json::json!({ "days": days }),
        reasoning: format!(
            "{} to {} spans {} calendar days counting both ends",
            start_date, end_date, days
        ),
    };

    LeaveDaysResult { days, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_three_day_span_is_inclusive() {
        assert_eq!(calculate_leave_days(date("2024-01-10"), date("2024-01-12")).days, 3);
    }

    #[test]
    fn test_single_day_counts_one() {
        assert_eq!(calculate_leave_days(date("2024-01-10"), date("2024-01-10")).days, 1);
    }

    #[test]
    fn test_span_across_month_and_leap_day() {
        assert_eq!(calculate_leave_days(date("2024-02-28"), date("2024-03-01")).days, 3);
    }

    #[test]
    fn test_reversed_dates_count_the_same() {
        assert_eq!(calculate_leave_days(date("2024-01-12"), date("2024-01-10")).days, 3);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        assert_eq!(span_days(at("2024-01-10 09:00:00"), at("2024-01-11 10:00:00")), 3);
        assert_eq!(span_days(at("2024-01-10 09:00:00"), at("2024-01-11 09:00:00")), 2);
    }

    #[test]
    fn test_audit_step_contents() {
        let result = calculate_leave_days(date("2024-01-10"), date("2024-01-12"));
        assert_eq!(result.audit_step.rule_id, "leave_day_count");
        assert_eq!(result.audit_step.output["days"], 3);
        assert_eq!(result.audit_step.input["start_date"], "2024-01-10");
    }
}
