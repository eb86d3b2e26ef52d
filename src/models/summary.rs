//! Report row types produced by the aggregator.

use serde::{Deserialize, Serialize};

use super::LeaveRequest;

/// One row of the leave summary report.
///
/// # Example
///
/// ```
/// use leave_engine::models::EmployeeLeaveSummary;
///
/// let row = EmployeeLeaveSummary {
///     employee_id: "emp_001".to_string(),
///     employee_name: "Asha Rao".to_string(),
///     pending_leaves: 1,
///     total_leave_days: 5,
///     extra_leaves: 4,
///     sandwich_count: 1,
///     sandwich_days: 2,
/// };
/// let json = serde_json::to_value(&row).unwrap();
/// assert_eq!(json["extra_leaves"], 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLeaveSummary {
    /// The employee's identifier.
    pub employee_id: String,
    /// The employee's display name, or "Unknown".
    pub employee_name: String,
    /// Leave balance as of the reference date, over the whole leave year.
    pub pending_leaves: u32,
    /// Approved leave days overlapping the month filter.
    pub total_leave_days: u32,
    /// Loss-of-pay days for the month filter.
    pub extra_leaves: u32,
    /// Distinct sandwich clusters in the month filter.
    pub sandwich_count: u32,
    /// Days charged for those clusters.
    pub sandwich_days: u32,
}

/// A leave request as shown in an employee's drill-down history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLeave {
    /// The underlying request.
    #[serde(flatten)]
    pub request: LeaveRequest,
    /// Inclusive day count, zero for malformed ranges.
    pub days: u32,
    /// Why this request is part of a sandwich pattern, if it is.
    pub sandwich_reasons: Vec<String>,
}
