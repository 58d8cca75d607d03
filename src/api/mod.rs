//! HTTP API module for the Workforce Engine.
//!
//! This module provides the REST endpoints for attendance, compensation,
//! payroll, performance reviews and leave.

mod actor;
mod handlers;
mod request;
mod response;
mod state;

pub use actor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
pub use handlers::create_router;
pub use request::{
    AttendanceEventRequest, GoalsRequest, LeaveDecisionRequest, PaymentRequest, PayrollRequest,
    ReviewRequest, SubmitRequest,
};
pub use response::{ApiError, ApiErrorResponse, Enriched};
pub use state::AppState;
