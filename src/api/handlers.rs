//! HTTP request handlers for the Leave Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    SummaryTable, build_history, build_summaries, parse_calendar_date, parse_sort_key,
};
use crate::config::LeavePolicy;
use crate::models::{Holiday, LeaveRequest, MonthFilter};

use super::request::{HistoryRequest, HolidayRecord, LeaveRequestRecord, SummaryRequest};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, SummaryResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/summaries", post(summaries_handler))
        .route("/summaries/export", post(export_handler))
        .route("/history", post(history_handler))
        .route("/policy", get(policy_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /summaries.
///
/// Returns the visible summary rows after search and sort.
async fn summaries_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing summaries request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match prepare_table(&state, request) {
        Ok(prepared) => {
            let rows = prepared.table.export_records();
            info!(
                correlation_id = %correlation_id,
                filter_month = %prepared.filter,
                as_of = %prepared.as_of,
                rows = rows.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Summaries computed successfully"
            );
            (
                StatusCode::OK,
                Json(SummaryResponse {
                    filter_month: prepared.filter,
                    as_of: prepared.as_of,
                    rows,
                }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                code = %err.error.code,
                error = %err.error.message,
                "Summaries request rejected"
            );
            err.into_response()
        }
    }
}

/// Handler for POST /summaries/export.
///
/// Same input as `/summaries`; renders the visible rows as CSV.
async fn export_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing export request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match prepare_table(&state, request) {
        Ok(prepared) => {
            let csv = prepared.table.to_csv();
            info!(
                correlation_id = %correlation_id,
                filter_month = %prepared.filter,
                bytes = csv.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Summary export rendered"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"leave_summary_{}.csv\"", prepared.filter),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                code = %err.error.code,
                error = %err.error.message,
                "Export request rejected"
            );
            err.into_response()
        }
    }
}

/// Handler for POST /history.
///
/// Returns one employee's leave requests, newest first, with sandwich reasons.
async fn history_handler(
    State(state): State<AppState>,
    payload: Result<Json<HistoryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing history request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let filter = match parse_filter(request.filter_month.as_deref()) {
        Ok(filter) => filter,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err.error.message,
                "History request rejected"
            );
            return err.into_response();
        }
    };

    let start_time = Instant::now();
    let leave_requests = convert_leaves(request.leave_requests, state.policy());
    let holidays = convert_holidays(request.holidays, state.policy());

    let history = build_history(&request.employee_id, &leave_requests, &holidays, &filter);
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        filter_month = %filter,
        entries = history.len(),
        duration_us = start_time.elapsed().as_micros(),
        "History built successfully"
    );

    (StatusCode::OK, Json(history)).into_response()
}

/// Handler for GET /policy.
async fn policy_handler(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.policy().clone())).into_response()
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// A summary table ready for viewing or export.
struct PreparedTable {
    filter: MonthFilter,
    as_of: NaiveDate,
    table: SummaryTable,
}

/// Validates the request's filter, reference date and sort, then builds the
/// searched and sorted table.
fn prepare_table(state: &AppState, request: SummaryRequest) -> Result<PreparedTable, ApiErrorResponse> {
    let policy = state.policy();
    let offset = policy.reference_offset();

    let filter = parse_filter(request.filter_month.as_deref())?;

    let as_of = match request.as_of.as_deref() {
        None => policy.today(),
        Some(raw) => parse_calendar_date(raw, offset).ok_or_else(|| {
            ApiErrorResponse::bad_request(ApiError::validation_error(format!(
                "Invalid as_of date '{}'",
                raw
            )))
        })?,
    };

    let sort = match request.sort {
        Some(sort) => Some((parse_sort_key(&sort.key)?, sort.direction)),
        None => None,
    };

    let leave_requests = convert_leaves(request.leave_requests, policy);
    let holidays = convert_holidays(request.holidays, policy);

    let rows = build_summaries(
        &request.employees,
        &leave_requests,
        &holidays,
        &filter,
        as_of,
        policy,
    );

    let mut table = SummaryTable::new(rows);
    if let Some(query) = request.search {
        table.set_query(query);
    }
    match sort {
        Some((key, Some(direction))) => {
            table.sort_with(key, direction);
        }
        Some((key, None)) => {
            table.sort_by(key);
        }
        None => {}
    }

    Ok(PreparedTable {
        filter,
        as_of,
        table,
    })
}

fn parse_filter(raw: Option<&str>) -> Result<MonthFilter, ApiErrorResponse> {
    match raw {
        None => Ok(MonthFilter::All),
        Some(value) => value.parse().map_err(ApiErrorResponse::from),
    }
}

fn convert_leaves(records: Vec<LeaveRequestRecord>, policy: &LeavePolicy) -> Vec<LeaveRequest> {
    records
        .into_iter()
        .map(|record| record.into_domain(policy))
        .collect()
}

fn convert_holidays(records: Vec<HolidayRecord>, policy: &LeavePolicy) -> Vec<Holiday> {
    records
        .into_iter()
        .map(|record| record.into_domain(policy))
        .collect()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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

    ApiErrorResponse::bad_request(error).into_response()
}
