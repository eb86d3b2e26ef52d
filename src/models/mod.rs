//! Core data models for the leave engine.
//!
//! The input records (employees, leave requests, holidays) are read-only
//! snapshots supplied by the surrounding application. The report types are
//! derived on every call and never persisted.

mod employee;
mod holiday;
mod leave_request;
mod month_filter;
mod summary;

pub use employee::{Employee, UNKNOWN_EMPLOYEE_NAME};
pub use holiday::Holiday;
pub use leave_request::{LeaveRequest, LeaveStatus};
pub use month_filter::MonthFilter;
pub use summary::{AnnotatedLeave, EmployeeLeaveSummary};
