//! HTTP request handlers for the Workforce Engine API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! request gets a correlation id that is attached to its log lines.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::directory::resolve_employee;
use crate::error::EngineError;
use crate::models::{Actor, CompensationInput, Period};
use crate::services::{
    AttendancePatch, BackfillAttendance, CompensationPatch, LeavePatch, NewLeave, NewReview,
};

use super::request::{
    AttendanceEventRequest, GoalsRequest, LeaveDecisionRequest, PaymentRequest, PayrollRequest,
    ReviewRequest, SubmitRequest,
};
use super::response::{ApiError, ApiErrorResponse, Enriched};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/attendance", post(backfill_attendance_handler))
        .route(
            "/attendance/:id",
            get(get_attendance_handler).put(update_attendance_handler),
        )
        .route("/compensation", post(create_compensation_handler))
        .route(
            "/compensation/:id",
            get(get_compensation_handler).put(update_compensation_handler),
        )
        .route("/compensation/:id/pay", post(pay_compensation_handler))
        .route("/compensation/:id/cancel", post(cancel_compensation_handler))
        .route("/payroll/process", post(process_payroll_handler))
        .route("/kpi", post(create_review_handler))
        .route("/kpi/:id", get(get_review_handler).put(replace_goals_handler))
        .route("/kpi/:id/submit", put(submit_review_handler))
        .route("/kpi/:id/review", put(review_handler))
        .route("/kpi/:id/approve", put(approve_review_handler))
        .route("/leave", post(create_leave_handler))
        .route("/leave/:id", get(get_leave_handler).put(update_leave_handler))
        .route("/leave/:id/decision", put(decide_leave_handler))
        .with_state(state)
}

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath = Result<Path<Uuid>, PathRejection>;

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn failure(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    ApiErrorResponse::from(error).into_response()
}

/// Unwraps a JSON body or builds the 400 response for it.
fn body<T>(correlation_id: Uuid, payload: JsonBody<T>) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error).into_response())
}

/// Like [`body`], but a request without a JSON body means "all defaults".
fn optional_body<T: Default>(correlation_id: Uuid, payload: JsonBody<T>) -> Result<T, Response> {
    match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        payload => body(correlation_id, payload),
    }
}

fn path_id(correlation_id: Uuid, path: IdPath) -> Result<Uuid, Response> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid record id"
        );
        ApiErrorResponse::bad_request(ApiError::invalid_field("id", rejection.body_text()))
            .into_response()
    })
}

/// Attaches the directory view of `employee_id` to a record.
async fn enriched<T: Serialize>(state: &AppState, employee_id: &str, record: T) -> Response {
    let employee = resolve_employee(state.directory(), employee_id).await;
    json_response(StatusCode::OK, Enriched { record, employee })
}

macro_rules! try_response {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(response) => return response,
        }
    };
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    payload: JsonBody<AttendanceEventRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-in");
    let request = try_response!(body(correlation_id, payload));

    match state.attendance().check_in(&request.employee_id).await {
        Ok(record) => json_response(StatusCode::CREATED, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    payload: JsonBody<AttendanceEventRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-out");
    let request = try_response!(body(correlation_id, payload));

    match state.attendance().check_out(&request.employee_id).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /attendance (privileged back-fill).
async fn backfill_attendance_handler(
    State(state): State<AppState>,
    actor: Actor,
    payload: JsonBody<BackfillAttendance>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, actor = %actor.label(), "Processing attendance back-fill");
    let request = try_response!(body(correlation_id, payload));

    match state.attendance().backfill_create(&actor, request).await {
        Ok(record) => json_response(StatusCode::CREATED, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for GET /attendance/:id.
async fn get_attendance_handler(State(state): State<AppState>, id: IdPath) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.attendance().get(id).await {
        Ok(record) => {
            let employee_id = record.employee_id.clone();
            enriched(&state, &employee_id, record).await
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /attendance/:id (privileged back-fill edit).
async fn update_attendance_handler(
    State(state): State<AppState>,
    id: IdPath,
    actor: Actor,
    payload: JsonBody<AttendancePatch>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, actor = %actor.label(), "Processing attendance edit");
    let id = try_response!(path_id(correlation_id, id));
    let patch = try_response!(body(correlation_id, payload));

    match state.attendance().backfill_update(&actor, id, patch).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /compensation.
async fn create_compensation_handler(
    State(state): State<AppState>,
    payload: JsonBody<CompensationInput>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compensation create");
    let inputs = try_response!(body(correlation_id, payload));

    match state.compensation().create(inputs).await {
        Ok(record) => json_response(StatusCode::CREATED, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for GET /compensation/:id.
async fn get_compensation_handler(State(state): State<AppState>, id: IdPath) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.compensation().get(id).await {
        Ok(record) => {
            let employee_id = record.inputs.employee_id.clone();
            enriched(&state, &employee_id, record).await
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /compensation/:id.
async fn update_compensation_handler(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<CompensationPatch>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compensation update");
    let id = try_response!(path_id(correlation_id, id));
    let patch = try_response!(body(correlation_id, payload));

    match state.compensation().update(id, patch).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /compensation/:id/pay.
async fn pay_compensation_handler(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<PaymentRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let request = try_response!(optional_body(correlation_id, payload));

    match state.compensation().mark_paid(id, request.payment_date).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /compensation/:id/cancel.
async fn cancel_compensation_handler(State(state): State<AppState>, id: IdPath) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.compensation().cancel(id).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /payroll/process.
async fn process_payroll_handler(
    State(state): State<AppState>,
    payload: JsonBody<PayrollRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = try_response!(body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        month = request.month,
        year = request.year,
        "Processing payroll batch"
    );

    let period = Period {
        month: request.month,
        year: request.year,
    };
    match state.payroll().run(period).await {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /kpi.
async fn create_review_handler(
    State(state): State<AppState>,
    payload: JsonBody<NewReview>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing performance review create");
    let request = try_response!(body(correlation_id, payload));

    match state.kpi().create(request).await {
        Ok(review) => json_response(StatusCode::CREATED, review),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for GET /kpi/:id.
async fn get_review_handler(State(state): State<AppState>, id: IdPath) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.kpi().get(id).await {
        Ok(review) => {
            let employee_id = review.employee_id.clone();
            enriched(&state, &employee_id, review).await
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /kpi/:id: replaces the goal list and rescores.
async fn replace_goals_handler(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<GoalsRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let request = try_response!(body(correlation_id, payload));

    match state.kpi().replace_goals(id, request.goals).await {
        Ok(review) => json_response(StatusCode::OK, review),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /kpi/:id/submit.
async fn submit_review_handler(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<SubmitRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let request = try_response!(optional_body(correlation_id, payload));

    match state.kpi().submit(id, request.employee_comment).await {
        Ok(review) => json_response(StatusCode::OK, review),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /kpi/:id/review.
async fn review_handler(
    State(state): State<AppState>,
    id: IdPath,
    actor: Actor,
    payload: JsonBody<ReviewRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let request = try_response!(optional_body(correlation_id, payload));

    match state.kpi().review(id, &actor, request.manager_comment).await {
        Ok(review) => json_response(StatusCode::OK, review),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /kpi/:id/approve.
async fn approve_review_handler(
    State(state): State<AppState>,
    id: IdPath,
    actor: Actor,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.kpi().approve(id, &actor).await {
        Ok(review) => json_response(StatusCode::OK, review),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for POST /leave.
async fn create_leave_handler(
    State(state): State<AppState>,
    payload: JsonBody<NewLeave>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave request");
    let request = try_response!(body(correlation_id, payload));

    match state.leave().create(request).await {
        Ok(leave) => json_response(StatusCode::CREATED, leave),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for GET /leave/:id.
async fn get_leave_handler(State(state): State<AppState>, id: IdPath) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));

    match state.leave().get(id).await {
        Ok(leave) => {
            let employee_id = leave.employee_id.clone();
            enriched(&state, &employee_id, leave).await
        }
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /leave/:id.
async fn update_leave_handler(
    State(state): State<AppState>,
    id: IdPath,
    actor: Actor,
    payload: JsonBody<LeavePatch>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let patch = try_response!(body(correlation_id, payload));

    match state.leave().update(id, &actor, patch).await {
        Ok(leave) => json_response(StatusCode::OK, leave),
        Err(err) => failure(correlation_id, err),
    }
}

/// Handler for PUT /leave/:id/decision.
async fn decide_leave_handler(
    State(state): State<AppState>,
    id: IdPath,
    actor: Actor,
    payload: JsonBody<LeaveDecisionRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = try_response!(path_id(correlation_id, id));
    let request = try_response!(body(correlation_id, payload));

    match state.leave().decide(id, &actor, request.status).await {
        Ok(leave) => json_response(StatusCode::OK, leave),
        Err(err) => failure(correlation_id, err),
    }
}
