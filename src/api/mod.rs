//! HTTP API module for the Leave Engine.
//!
//! This module provides the REST endpoints for the leave summary report,
//! its CSV export, per-employee history, and the active policy.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{HistoryRequest, HolidayRecord, LeaveRequestRecord, SortRequest, SummaryRequest};
pub use response::{ApiError, ApiErrorResponse, HealthResponse, SummaryResponse};
pub use state::AppState;
