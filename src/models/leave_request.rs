//! Leave request model.
//!
//! Leave requests are owned by the approval workflow. Balance and pattern
//! math only look at approved requests; history views show every status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::DateSpan;

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    #[serde(alias = "Pending")]
    Pending,
    /// Approved; counts towards balance and sandwich detection.
    #[serde(alias = "Approved")]
    Approved,
    /// Rejected; shown in history only.
    #[serde(alias = "Rejected")]
    Rejected,
    /// Any status the engine does not know, e.g. "Cancelled". Treated as
    /// not approved.
    #[serde(other)]
    Other,
}

impl LeaveStatus {
    /// Maps an upstream status string, case-insensitively.
    ///
    /// Unknown values become [`LeaveStatus::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::LeaveStatus;
    ///
    /// assert_eq!(LeaveStatus::parse_lenient(" APPROVED "), LeaveStatus::Approved);
    /// assert_eq!(LeaveStatus::parse_lenient("Cancelled"), LeaveStatus::Other);
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("pending") {
            LeaveStatus::Pending
        } else if value.eq_ignore_ascii_case("approved") {
            LeaveStatus::Approved
        } else if value.eq_ignore_ascii_case("rejected") {
            LeaveStatus::Rejected
        } else {
            LeaveStatus::Other
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "Pending"),
            LeaveStatus::Approved => write!(f, "Approved"),
            LeaveStatus::Rejected => write!(f, "Rejected"),
            LeaveStatus::Other => write!(f, "Other"),
        }
    }
}

/// A single leave request.
///
/// Dates are optional because upstream records may carry values that could
/// not be parsed. A request with a missing endpoint contributes zero days and
/// is ignored by adjacency checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee who requested the leave.
    pub employee_id: String,
    /// First day of leave (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day of leave (inclusive).
    pub to: Option<NaiveDate>,
    /// Current approval state.
    pub status: LeaveStatus,
    /// Leave category as named by the host application (e.g. "Casual").
    #[serde(default)]
    pub leave_type: String,
    /// Free-text reason given by the employee.
    #[serde(default)]
    pub reason: String,
    /// When the request was submitted.
    #[serde(default)]
    pub request_date: Option<NaiveDate>,
}

impl LeaveRequest {
    /// Returns true if the request has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Returns the normalized inclusive span, or `None` if either endpoint is
    /// missing or the range is reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::{LeaveRequest, LeaveStatus};
    /// use chrono::NaiveDate;
    ///
    /// let request = LeaveRequest {
    ///     employee_id: "emp_001".to_string(),
    ///     from: NaiveDate::from_ymd_opt(2025, 5, 12),
    ///     to: NaiveDate::from_ymd_opt(2025, 5, 14),
    ///     status: LeaveStatus::Approved,
    ///     leave_type: "Casual".to_string(),
    ///     reason: String::new(),
    ///     request_date: None,
    /// };
    /// assert_eq!(request.span().unwrap().days(), 3);
    /// ```
    pub fn span(&self) -> Option<DateSpan> {
        DateSpan::new(self.from?, self.to?)
    }

    /// Returns the inclusive number of leave days, or zero if malformed.
    pub fn days(&self) -> u32 {
        self.span().map_or(0, |span| span.days())
    }
}
