//! Calculation logic for the Workforce Engine.
//!
//! This module contains the pure derivations the write paths invoke
//! immediately before persistence: salary derivation from base pay and
//! adjustment bundles, check-in classification and worked-hour derivation,
//! weighted KPI scoring with rating classification, and inclusive leave
//! day counting.

mod kpi_score;
mod leave_days;
mod salary;
mod work_hours;

pub use kpi_score::{KpiScoreResult, classify_rating, goal_achievement, score_goals, validate_goals};
pub use leave_days::{LeaveDaysResult, MILLIS_PER_DAY, calculate_leave_days, span_days};
pub use salary::{SalaryBreakdown, calculate_salary, validate_compensation};
pub use work_hours::{WorkHoursResult, calculate_work_hours, classify_check_in};
