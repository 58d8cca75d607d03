//! Request types for the Workforce Engine API.
//!
//! Bodies that map one-to-one onto a service input reuse the service type;
//! the small workflow bodies are defined here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Goal, LeaveStatus};

pub use crate::services::{
    AttendancePatch, BackfillAttendance, CompensationPatch, LeavePatch, NewLeave, NewReview,
};

/// Body of `/attendance/check-in` and `/attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEventRequest {
    /// The employee checking in or out.
    pub employee_id: String,
}

/// Body of `/payroll/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Month to process (1-12).
    pub month: u32,
    /// Year to process.
    pub year: i32,
}

/// Body of `/compensation/:id/pay`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Payment date; today when omitted.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

/// Body of `PUT /kpi/:id`: the full replacement goal list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsRequest {
    /// The new goal list.
    pub goals: Vec<Goal>,
}

/// Body of `/kpi/:id/submit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Optional self-assessment.
    #[serde(default)]
    pub employee_comment: Option<String>,
}

/// Body of `/kpi/:id/review`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// The manager's assessment.
    #[serde(default)]
    pub manager_comment: Option<String>,
}

/// Body of `/leave/:id/decision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDecisionRequest {
    /// `approved` or `rejected`.
    pub status: LeaveStatus,
}
