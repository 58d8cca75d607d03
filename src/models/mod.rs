//! Core data models for the Workforce Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod compensation;
mod employee;
mod kpi;
mod leave;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use audit::AuditStep;
pub use compensation::{
    Allowances, Bonuses, CompensationInput, CompensationRecord, CompensationStatus, Deductions,
    Penalties, Period,
};
pub use employee::{Actor, DirectoryEntry, EmployeeProfile, EmployeeRef, Role, RosterEntry};
pub use kpi::{Goal, PerformanceReview, Rating, ReviewPeriod, ReviewPeriodType, ReviewStatus};
pub use leave::{LeaveAdjustment, LeaveRequest, LeaveStatus, LeaveType};
