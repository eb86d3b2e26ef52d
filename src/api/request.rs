//! Request types for the Leave Engine API.
//!
//! Dates and statuses arrive as raw JSON values. Dates are normalized to
//! calendar dates with the policy's reference offset. A value that cannot be
//! used degrades its record (the date becomes `None`, the status becomes
//! [`LeaveStatus::Other`]) instead of failing the request.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::calculation::{SortDirection, calculate_leave_days, parse_calendar_date};
use crate::config::LeavePolicy;
use crate::models::{Employee, Holiday, LeaveRequest, LeaveStatus};

/// Request body for `/summaries` and `/summaries/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// The employee directory.
    pub employees: Vec<Employee>,
    /// Every known leave request, any status.
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequestRecord>,
    /// The holiday calendar.
    #[serde(default)]
    pub holidays: Vec<HolidayRecord>,
    /// `"All"` or `"YYYY-MM"`; defaults to `"All"`.
    #[serde(default)]
    pub filter_month: Option<String>,
    /// Reference date for the balance; defaults to today.
    #[serde(default)]
    pub as_of: Option<String>,
    /// Case-insensitive search over employee id and name.
    #[serde(default)]
    pub search: Option<String>,
    /// Column to sort by.
    #[serde(default)]
    pub sort: Option<SortRequest>,
}

/// Request body for `/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Employee whose history is requested.
    pub employee_id: String,
    /// Every known leave request, any status.
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequestRecord>,
    /// The holiday calendar.
    #[serde(default)]
    pub holidays: Vec<HolidayRecord>,
    /// `"All"` or `"YYYY-MM"`; defaults to `"All"`.
    #[serde(default)]
    pub filter_month: Option<String>,
}

/// Sort instruction for the summary table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortRequest {
    /// Column name, e.g. `"pending_leaves"`.
    pub key: String,
    /// Explicit direction; ascending when omitted.
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

/// A leave request as sent by the approval workflow.
///
/// Dates and status are kept as raw JSON values so that a malformed value
/// degrades this record only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestRecord {
    /// Employee the leave belongs to.
    pub employee_id: String,
    /// First leave day.
    #[serde(default)]
    pub from: Option<Value>,
    /// Last leave day.
    #[serde(default)]
    pub to: Option<Value>,
    /// Approval state; unknown values are treated as not approved.
    #[serde(default)]
    pub status: Option<Value>,
    /// Free-form leave category.
    #[serde(default)]
    pub leave_type: String,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: String,
    /// When the request was filed.
    #[serde(default)]
    pub request_date: Option<Value>,
}

/// A holiday calendar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// Holiday name.
    pub name: String,
    /// First day of the holiday.
    #[serde(default)]
    pub start_date: Option<Value>,
    /// Last day of the holiday.
    #[serde(default)]
    pub end_date: Option<Value>,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

impl LeaveRequestRecord {
    /// Converts to the domain type, normalizing dates with `policy`.
    pub fn into_domain(self, policy: &LeavePolicy) -> LeaveRequest {
        let offset = policy.reference_offset();
        let owner = self.employee_id.as_str();

        let (from, to) = bounded_range(
            owner,
            normalize_date(owner, "from", self.from.as_ref(), true, offset),
            normalize_date(owner, "to", self.to.as_ref(), true, offset),
            policy.max_range_days,
        );
        let request_date = normalize_date(owner, "request_date", self.request_date.as_ref(), false, offset);
        let status = normalize_status(owner, self.status.as_ref());

        LeaveRequest {
            employee_id: self.employee_id,
            from,
            to,
            status,
            leave_type: self.leave_type,
            reason: self.reason,
            request_date,
        }
    }
}

impl HolidayRecord {
    /// Converts to the domain type, normalizing dates with `policy`.
    pub fn into_domain(self, policy: &LeavePolicy) -> Holiday {
        let offset = policy.reference_offset();
        let owner = self.name.as_str();

        let (start_date, end_date) = bounded_range(
            owner,
            normalize_date(owner, "start_date", self.start_date.as_ref(), true, offset),
            normalize_date(owner, "end_date", self.end_date.as_ref(), true, offset),
            policy.max_range_days,
        );

        Holiday {
            name: self.name,
            start_date,
            end_date,
            description: self.description,
        }
    }
}

/// Parses one wire date, logging a warning when the record gets degraded.
///
/// A missing optional field is silently `None`. Only strings can hold a
/// date; any other JSON value degrades the record.
fn normalize_date(
    owner: &str,
    field: &'static str,
    raw: Option<&Value>,
    required: bool,
    offset: FixedOffset,
) -> Option<NaiveDate> {
    let raw = match raw {
        None | Some(Value::Null) => {
            if required {
                warn!(owner = %owner, field, "Missing date; record contributes zero days");
            }
            return None;
        }
        Some(Value::String(raw)) => raw,
        Some(other) => {
            warn!(
                owner = %owner,
                field,
                raw_value = %other,
                "Date is not a string; record contributes zero days"
            );
            return None;
        }
    };

    let parsed = parse_calendar_date(raw, offset);
    if parsed.is_none() {
        warn!(
            owner = %owner,
            field,
            raw_value = %raw,
            "Unparsable date; record contributes zero days"
        );
    }
    parsed
}

/// Drops both endpoints of a range longer than `max_days`.
fn bounded_range(
    owner: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    max_days: u32,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let days = calculate_leave_days(start, end);
    if days > max_days {
        warn!(
            owner = %owner,
            days,
            max_days,
            "Date range too long; record contributes zero days"
        );
        return (None, None);
    }
    (start, end)
}

fn normalize_status(owner: &str, raw: Option<&Value>) -> LeaveStatus {
    let status = match raw {
        Some(Value::String(raw)) => LeaveStatus::parse_lenient(raw),
        _ => LeaveStatus::Other,
    };
    if status == LeaveStatus::Other {
        warn!(
            owner = %owner,
            raw_value = ?raw,
            "Unknown leave status; treated as not approved"
        );
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> LeavePolicy {
        LeavePolicy::default()
    }

    fn record(from: Value, to: Value, status: Value) -> LeaveRequestRecord {
        LeaveRequestRecord {
            employee_id: "emp_001".to_string(),
            from: Some(from),
            to: Some(to),
            status: Some(status),
            leave_type: "Casual".to_string(),
            reason: String::new(),
            request_date: None,
        }
    }

    #[test]
    fn test_deserialize_summary_request() {
        let json = r#"{
            "employees": [
                { "id": "emp_001", "name": "Asha Rao" },
                { "id": "emp_002" }
            ],
            "leave_requests": [
                {
                    "employee_id": "emp_001",
                    "from": "2025-05-14",
                    "to": "2025-05-16",
                    "status": "Approved",
                    "leave_type": "Casual"
                }
            ],
            "holidays": [
                { "name": "Christmas", "start_date": "2025-12-25", "end_date": "2025-12-25" }
            ],
            "filter_month": "2025-05",
            "sort": { "key": "pending_leaves", "direction": "desc" }
        }"#;

        let request: SummaryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employees.len(), 2);
        assert_eq!(request.employees[1].name, None);
        assert_eq!(request.leave_requests[0].status, Some(json!("Approved")));
        assert_eq!(request.filter_month.as_deref(), Some("2025-05"));
        assert_eq!(request.as_of, None);

        let sort = request.sort.unwrap();
        assert_eq!(sort.key, "pending_leaves");
        assert_eq!(sort.direction, Some(SortDirection::Descending));
    }

    #[test]
    fn test_deserialize_accepts_non_string_dates_and_status() {
        let json = r#"{
            "employee_id": "emp_002",
            "from": 1747180800000,
            "to": null,
            "status": 3
        }"#;

        let record: LeaveRequestRecord = serde_json::from_str(json).unwrap();
        let leave = record.into_domain(&policy());
        assert_eq!(leave.from, None);
        assert_eq!(leave.to, None);
        assert_eq!(leave.status, LeaveStatus::Other);
        assert_eq!(leave.days(), 0);
    }

    #[test]
    fn test_deserialize_history_request_defaults() {
        let json = r#"{ "employee_id": "emp_001" }"#;

        let request: HistoryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "emp_001");
        assert!(request.leave_requests.is_empty());
        assert!(request.holidays.is_empty());
        assert_eq!(request.filter_month, None);
    }

    #[test]
    fn test_leave_conversion_normalizes_timestamps() {
        let mut record = record(
            json!("2025-05-13T18:30:00.000Z"),
            json!("2025-05-16"),
            json!("approved"),
        );
        record.request_date = Some(json!("2025-05-01T09:00:00"));

        let leave = record.into_domain(&policy());
        assert_eq!(leave.from, NaiveDate::from_ymd_opt(2025, 5, 14));
        assert_eq!(leave.to, NaiveDate::from_ymd_opt(2025, 5, 16));
        assert_eq!(leave.request_date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(leave.status, LeaveStatus::Approved);
        assert_eq!(leave.days(), 3);
    }

    #[test]
    fn test_leave_conversion_degrades_bad_dates() {
        let mut record = record(json!("Invalid Date"), Value::Null, json!("Approved"));
        record.to = None;

        let leave = record.into_domain(&policy());
        assert_eq!(leave.from, None);
        assert_eq!(leave.to, None);
        assert_eq!(leave.days(), 0);
    }

    #[test]
    fn test_unknown_status_is_not_approved() {
        let leave = record(json!("2025-05-12"), json!("2025-05-12"), json!("Cancelled")).into_domain(&policy());
        assert_eq!(leave.status, LeaveStatus::Other);
        assert!(!leave.is_approved());
        assert_eq!(leave.days(), 1);

        let mut missing = record(json!("2025-05-12"), json!("2025-05-12"), Value::Null);
        missing.status = None;
        assert_eq!(missing.into_domain(&policy()).status, LeaveStatus::Other);
    }

    #[test]
    fn test_overlong_range_is_dropped() {
        let leave = record(json!("0001-01-01"), json!("9999-12-31"), json!("approved")).into_domain(&policy());
        assert_eq!(leave.from, None);
        assert_eq!(leave.to, None);

        // Exactly at the limit is kept
        let policy = LeavePolicy {
            max_range_days: 3,
            ..LeavePolicy::default()
        };
        let leave = record(json!("2025-05-12"), json!("2025-05-14"), json!("approved")).into_domain(&policy);
        assert_eq!(leave.days(), 3);
        let leave = record(json!("2025-05-12"), json!("2025-05-15"), json!("approved")).into_domain(&policy);
        assert_eq!(leave.days(), 0);
    }

    #[test]
    fn test_holiday_conversion() {
        let record = HolidayRecord {
            name: "Diwali".to_string(),
            start_date: Some(json!("2025-10-20")),
            end_date: Some(json!("2025-10-21")),
            description: String::new(),
        };

        let holiday = record.into_domain(&policy());
        assert_eq!(holiday.name, "Diwali");
        assert_eq!(holiday.span().map(|s| s.days()), Some(2));
    }

    #[test]
    fn test_holiday_with_numeric_date_is_skipped() {
        let record = HolidayRecord {
            name: "Broken".to_string(),
            start_date: Some(json!(20251020)),
            end_date: Some(json!("2025-10-21")),
            description: String::new(),
        };

        assert_eq!(record.into_domain(&policy()).span(), None);
    }
}
