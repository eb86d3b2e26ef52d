//! Per-employee leave report.
//!
//! Combines the accrual ledger and the sandwich detector into summary rows,
//! and provides the searchable, sortable, exportable view over them plus the
//! per-employee drill-down history.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LeavePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnnotatedLeave, Employee, EmployeeLeaveSummary, Holiday, LeaveRequest, MonthFilter,
    UNKNOWN_EMPLOYEE_NAME,
};

use super::accrual_ledger::compute_available_leaves;
use super::sandwich::{LeaveDaySet, compute_sandwich_leaves, detect_clusters, reasons_within};

/// Column headers of the CSV export, in column order.
pub const CSV_HEADERS: [&str; 7] = [
    "Employee ID",
    "Employee Name",
    "Pending Leaves",
    "Total Leave Days",
    "Extra Leaves (LOP)",
    "Sandwich Count",
    "Sandwich Days",
];

/// Builds one summary row per employee.
///
/// Rows follow directory order. Employee ids that only appear in leave
/// requests get a trailing row each, sorted by id and labelled "Unknown".
///
/// - `pending_leaves` is the ledger balance as of `as_of` over the whole
///   leave year; it ignores `filter`.
/// - `total_leave_days` sums approved requests overlapping `filter`.
/// - `extra_leaves` is the part of `total_leave_days` above the monthly
///   allotment (`policy.monthly_accrual`).
/// - `sandwich_count` and `sandwich_days` come from the sandwich detector.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::build_summaries;
/// use leave_engine::config::LeavePolicy;
/// use leave_engine::models::{Employee, MonthFilter};
/// use chrono::NaiveDate;
///
/// let rows = build_summaries(
///     &[Employee::new("emp_001", "Asha Rao")],
///     &[],
///     &[],
///     &MonthFilter::All,
///     NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
///     &LeavePolicy::with_start_month(4),
/// );
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].pending_leaves, 3);
/// assert_eq!(rows[0].extra_leaves, 0);
/// ```
pub fn build_summaries(
    employees: &[Employee],
    requests: &[LeaveRequest],
    holidays: &[Holiday],
    filter: &MonthFilter,
    as_of: NaiveDate,
    policy: &LeavePolicy,
) -> Vec<EmployeeLeaveSummary> {
    let mut approved_by_employee: BTreeMap<&str, Vec<&LeaveRequest>> = BTreeMap::new();
    for request in requests {
        let entry = approved_by_employee
            .entry(request.employee_id.as_str())
            .or_default();
        if request.is_approved() {
            entry.push(request);
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(employees.len());

    for employee in employees {
        if !seen.insert(employee.id.as_str()) {
            continue;
        }
        let approved = approved_by_employee
            .get(employee.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        rows.push(summarize(
            &employee.id,
            employee.display_name(),
            approved,
            holidays,
            filter,
            as_of,
            policy,
        ));
    }

    for (employee_id, approved) in &approved_by_employee {
        if seen.contains(employee_id) {
            continue;
        }
        rows.push(summarize(
            employee_id,
            UNKNOWN_EMPLOYEE_NAME,
            approved,
            holidays,
            filter,
            as_of,
            policy,
        ));
    }

    debug!(
        rows = rows.len(),
        filter = %filter,
        as_of = %as_of,
        "Leave summaries built"
    );

    rows
}

fn summarize(
    employee_id: &str,
    employee_name: &str,
    approved: &[&LeaveRequest],
    holidays: &[Holiday],
    filter: &MonthFilter,
    as_of: NaiveDate,
    policy: &LeavePolicy,
) -> EmployeeLeaveSummary {
    let pending_leaves = compute_available_leaves(approved.iter().copied(), as_of, policy);

    let total_leave_days = approved
        .iter()
        .filter_map(|leave| leave.span())
        .filter(|span| filter.overlaps(span))
        .fold(0u32, |total, span| total.saturating_add(span.days()));

    let extra_leaves = total_leave_days.saturating_sub(policy.monthly_accrual);
    let sandwich = compute_sandwich_leaves(approved.iter().copied(), holidays, filter, policy);

    EmployeeLeaveSummary {
        employee_id: employee_id.to_string(),
        employee_name: employee_name.to_string(),
        pending_leaves,
        total_leave_days,
        extra_leaves,
        sandwich_count: sandwich.count,
        sandwich_days: sandwich.days,
    }
}

/// Builds an employee's leave history, newest first.
///
/// Includes every status. With a month filter, only requests overlapping
/// the month are kept. Ordering is by request date, falling back to the
/// start date; undated requests go last. Approved entries carry their
/// sandwich reasons, computed against the employee's approved leave; other
/// statuses never do, even when they repeat an approved range.
pub fn build_history(
    employee_id: &str,
    requests: &[LeaveRequest],
    holidays: &[Holiday],
    filter: &MonthFilter,
) -> Vec<AnnotatedLeave> {
    let own: Vec<&LeaveRequest> = requests
        .iter()
        .filter(|request| request.employee_id == employee_id)
        .collect();

    let days = LeaveDaySet::from_approved(own.iter().copied());
    let clusters = detect_clusters(&days, holidays);

    let mut history: Vec<AnnotatedLeave> = own
        .into_iter()
        .filter(|request| match filter {
            MonthFilter::All => true,
            MonthFilter::Month { .. } => request.span().is_some_and(|span| filter.overlaps(&span)),
        })
        .map(|request| {
            let span = request.span();
            AnnotatedLeave {
                request: request.clone(),
                days: span.map_or(0, |span| span.days()),
                sandwich_reasons: span
                    .filter(|_| request.is_approved())
                    .map(|span| reasons_within(&clusters, &span))
                    .unwrap_or_default(),
            }
        })
        .collect();

    history.sort_by(|a, b| history_key(b).cmp(&history_key(a)));
    history
}

fn history_key(entry: &AnnotatedLeave) -> Option<NaiveDate> {
    entry.request.request_date.or(entry.request.from)
}

/// A sortable summary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Employee identifier.
    EmployeeId,
    /// Employee display name.
    EmployeeName,
    /// Leave balance.
    PendingLeaves,
    /// Leave days in the filter month.
    TotalLeaveDays,
    /// Loss-of-pay days.
    ExtraLeaves,
    /// Distinct sandwich clusters.
    SandwichCount,
    /// Sandwich days charged.
    SandwichDays,
}

impl SortKey {
    fn compare(self, a: &EmployeeLeaveSummary, b: &EmployeeLeaveSummary) -> Ordering {
        match self {
            SortKey::EmployeeId => compare_text(&a.employee_id, &b.employee_id),
            SortKey::EmployeeName => compare_text(&a.employee_name, &b.employee_name),
            SortKey::PendingLeaves => a.pending_leaves.cmp(&b.pending_leaves),
            SortKey::TotalLeaveDays => a.total_leave_days.cmp(&b.total_leave_days),
            SortKey::ExtraLeaves => a.extra_leaves.cmp(&b.extra_leaves),
            SortKey::SandwichCount => a.sandwich_count.cmp(&b.sandwich_count),
            SortKey::SandwichDays => a.sandwich_days.cmp(&b.sandwich_days),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl FromStr for SortKey {
    type Err = EngineError;

    /// Accepts snake_case or camelCase column names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "employeeid" | "id" => Ok(SortKey::EmployeeId),
            "employeename" | "name" => Ok(SortKey::EmployeeName),
            "pendingleaves" => Ok(SortKey::PendingLeaves),
            "totalleavedays" => Ok(SortKey::TotalLeaveDays),
            "extraleaves" => Ok(SortKey::ExtraLeaves),
            "sandwichcount" => Ok(SortKey::SandwichCount),
            "sandwichdays" => Ok(SortKey::SandwichDays),
            _ => Err(EngineError::InvalidSortKey {
                value: s.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Column being sorted.
    pub key: SortKey,
    /// Direction of the sort.
    pub direction: SortDirection,
}

/// Searchable, sortable view over summary rows.
///
/// Sorting is stable and is applied to the current row order, so sorting by
/// one column and then another keeps ties in the earlier order.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{SortDirection, SortKey, SummaryTable};
/// use leave_engine::models::EmployeeLeaveSummary;
///
/// let row = |id: &str, name: &str, pending| EmployeeLeaveSummary {
///     employee_id: id.to_string(),
///     employee_name: name.to_string(),
///     pending_leaves: pending,
///     total_leave_days: 0,
///     extra_leaves: 0,
///     sandwich_count: 0,
///     sandwich_days: 0,
/// };
/// let mut table = SummaryTable::new(vec![row("e1", "Asha", 3), row("e2", "Ravi", 1)]);
///
/// assert_eq!(table.sort_by(SortKey::PendingLeaves).direction, SortDirection::Ascending);
/// assert_eq!(table.visible()[0].employee_id, "e2");
///
/// // Sorting the same column again flips the direction
/// assert_eq!(table.sort_by(SortKey::PendingLeaves).direction, SortDirection::Descending);
/// assert_eq!(table.visible()[0].employee_id, "e1");
///
/// table.set_query("RAV");
/// assert_eq!(table.visible().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    rows: Vec<EmployeeLeaveSummary>,
    query: String,
    sort: Option<SortState>,
}

impl SummaryTable {
    /// Creates a view with no search and no sort.
    pub fn new(rows: Vec<EmployeeLeaveSummary>) -> Self {
        Self {
            rows,
            query: String::new(),
            sort: None,
        }
    }

    /// Sets the case-insensitive search applied to id and name.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Returns the current sort, if any.
    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Sorts by `key`, ascending for a new key and toggling for a repeated one.
    pub fn sort_by(&mut self, key: SortKey) -> SortState {
        let direction = match self.sort {
            Some(current) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort_with(key, direction)
    }

    /// Sorts by `key` in an explicit direction.
    pub fn sort_with(&mut self, key: SortKey, direction: SortDirection) -> SortState {
        self.rows.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let state = SortState { key, direction };
        self.sort = Some(state);
        state
    }

    /// Rows matching the search, in the current sort order.
    pub fn visible(&self) -> Vec<&EmployeeLeaveSummary> {
        let query = self.query.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                query.is_empty()
                    || row.employee_id.to_lowercase().contains(&query)
                    || row.employee_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Flat copies of the visible rows.
    pub fn export_records(&self) -> Vec<EmployeeLeaveSummary> {
        self.visible().into_iter().cloned().collect()
    }

    /// Renders the visible rows as CSV with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADERS.join(",");
        out.push_str("\r\n");

        for row in self.visible() {
            let fields = [
                csv_field(&row.employee_id),
                csv_field(&row.employee_name),
                Cow::Owned(row.pending_leaves.to_string()),
                Cow::Owned(row.total_leave_days.to_string()),
                Cow::Owned(row.extra_leaves.to_string()),
                Cow::Owned(row.sandwich_count.to_string()),
                Cow::Owned(row.sandwich_days.to_string()),
            ];
            out.push_str(&fields.join(","));
            out.push_str("\r\n");
        }

        out
    }
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Parses a sort key, for callers holding raw strings.
pub fn parse_sort_key(value: &str) -> EngineResult<SortKey> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request(employee_id: &str, from: &str, to: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            employee_id: employee_id.to_string(),
            from: Some(date(from)),
            to: Some(date(to)),
            status,
            leave_type: "Casual".to_string(),
            reason: String::new(),
            request_date: None,
        }
    }

    fn row(id: &str, name: &str, pending: u32, total: u32) -> EmployeeLeaveSummary {
        EmployeeLeaveSummary {
            employee_id: id.to_string(),
            employee_name: name.to_string(),
            pending_leaves: pending,
            total_leave_days: total,
            extra_leaves: total.saturating_sub(1),
            sandwich_count: 0,
            sandwich_days: 0,
        }
    }

    fn may() -> MonthFilter {
        MonthFilter::month(2025, 5).unwrap()
    }

    fn policy() -> LeavePolicy {
        LeavePolicy::with_start_month(4)
    }

    #[test]
    fn test_scenario_d_extra_leaves() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![
            request("emp_001", "2025-05-05", "2025-05-07", LeaveStatus::Approved),
            request("emp_001", "2025-05-20", "2025-05-21", LeaveStatus::Approved),
        ];

        let rows = build_summaries(&employees, &requests, &[], &may(), date("2025-06-15"), &policy());
        assert_eq!(rows[0].total_leave_days, 5);
        assert_eq!(rows[0].extra_leaves, 4);
    }

    #[test]
    fn test_scenario_a_pending_leaves_ignores_filter() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![request("emp_001", "2025-05-14", "2025-05-16", LeaveStatus::Approved)];
        let june = MonthFilter::month(2025, 6).unwrap();

        let rows = build_summaries(&employees, &requests, &[], &june, date("2025-06-15"), &policy());
        assert_eq!(rows[0].pending_leaves, 1);
        assert_eq!(rows[0].total_leave_days, 0);
        assert_eq!(rows[0].extra_leaves, 0);
    }

    #[test]
    fn test_employee_without_history_gets_row() {
        let employees = vec![Employee::new("emp_001", "Asha Rao"), Employee::new("emp_002", "Ravi Menon")];
        let requests = vec![request("emp_001", "2025-05-14", "2025-05-14", LeaveStatus::Approved)];

        let rows = build_summaries(&employees, &requests, &[], &MonthFilter::All, date("2025-06-15"), &policy());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].employee_id, "emp_002");
        assert_eq!(rows[1].pending_leaves, 3);
        assert_eq!(rows[1].total_leave_days, 0);
    }

    #[test]
    fn test_unknown_employee_gets_sentinel_row() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![
            request("emp_009", "2025-05-14", "2025-05-14", LeaveStatus::Approved),
            request("emp_005", "2025-05-14", "2025-05-14", LeaveStatus::Pending),
        ];

        let rows = build_summaries(&employees, &requests, &[], &MonthFilter::All, date("2025-06-15"), &policy());
        let ids: Vec<&str> = rows.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["emp_001", "emp_005", "emp_009"]);
        assert_eq!(rows[1].employee_name, UNKNOWN_EMPLOYEE_NAME);
        assert_eq!(rows[2].employee_name, UNKNOWN_EMPLOYEE_NAME);
        assert_eq!(rows[2].total_leave_days, 1);
    }

    #[test]
    fn test_duplicate_directory_entries_yield_one_row() {
        let employees = vec![Employee::new("emp_001", "Asha Rao"), Employee::new("emp_001", "Asha R.")];

        let rows = build_summaries(&employees, &[], &[], &MonthFilter::All, date("2025-06-15"), &policy());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name, "Asha Rao");
    }

    #[test]
    fn test_only_approved_leave_counts() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![
            request("emp_001", "2025-05-05", "2025-05-07", LeaveStatus::Pending),
            request("emp_001", "2025-05-12", "2025-05-12", LeaveStatus::Rejected),
        ];

        let rows = build_summaries(&employees, &requests, &[], &may(), date("2025-06-15"), &policy());
        assert_eq!(rows[0].total_leave_days, 0);
        assert_eq!(rows[0].pending_leaves, 3);
    }

    #[test]
    fn test_straddling_leave_counts_in_full_for_overlapping_month() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![request("emp_001", "2025-04-29", "2025-05-02", LeaveStatus::Approved)];

        let rows = build_summaries(&employees, &requests, &[], &may(), date("2025-06-15"), &policy());
        assert_eq!(rows[0].total_leave_days, 4);
    }

    #[test]
    fn test_malformed_leave_is_degraded_not_fatal() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let mut broken = request("emp_001", "2025-05-05", "2025-05-07", LeaveStatus::Approved);
        broken.from = None;
        let requests = vec![broken, request("emp_001", "2025-05-12", "2025-05-12", LeaveStatus::Approved)];

        let rows = build_summaries(&employees, &requests, &[], &may(), date("2025-06-15"), &policy());
        assert_eq!(rows[0].total_leave_days, 1);
    }

    #[test]
    fn test_sandwich_columns_are_populated() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![
            request("emp_001", "2025-12-24", "2025-12-24", LeaveStatus::Approved),
            request("emp_001", "2025-12-26", "2025-12-26", LeaveStatus::Approved),
        ];
        let holidays = vec![Holiday {
            name: "Christmas".to_string(),
            start_date: Some(date("2025-12-25")),
            end_date: Some(date("2025-12-25")),
            description: String::new(),
        }];
        let december = MonthFilter::month(2025, 12).unwrap();

        let rows = build_summaries(&employees, &requests, &holidays, &december, date("2025-12-31"), &policy());
        assert_eq!(rows[0].sandwich_count, 1);
        assert_eq!(rows[0].sandwich_days, 2);
        assert_eq!(rows[0].total_leave_days, 2);
        assert_eq!(rows[0].extra_leaves, 1);
    }

    #[test]
    fn test_extra_leaves_follow_policy_allotment() {
        let employees = vec![Employee::new("emp_001", "Asha Rao")];
        let requests = vec![request("emp_001", "2025-05-05", "2025-05-09", LeaveStatus::Approved)];
        let generous = LeavePolicy {
            monthly_accrual: 2,
            ..policy()
        };

        let rows = build_summaries(&employees, &requests, &[], &may(), date("2025-06-15"), &generous);
        assert_eq!(rows[0].extra_leaves, 3);
    }

    #[test]
    fn test_sort_by_toggles_direction() {
        let mut table = SummaryTable::new(vec![row("e1", "Asha", 3, 0), row("e2", "Ravi", 1, 0)]);

        let first = table.sort_by(SortKey::PendingLeaves);
        assert_eq!(first.direction, SortDirection::Ascending);
        assert_eq!(table.visible()[0].employee_id, "e2");

        let second = table.sort_by(SortKey::PendingLeaves);
        assert_eq!(second.direction, SortDirection::Descending);
        assert_eq!(table.visible()[0].employee_id, "e1");

        let third = table.sort_by(SortKey::EmployeeName);
        assert_eq!(third.direction, SortDirection::Ascending);
        assert_eq!(table.sort_state(), Some(third));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut table = SummaryTable::new(vec![
            row("e1", "Asha", 2, 0),
            row("e2", "Ravi", 1, 0),
            row("e3", "Meera", 2, 0),
            row("e4", "Kiran", 1, 0),
        ]);

        table.sort_with(SortKey::PendingLeaves, SortDirection::Ascending);
        let ids: Vec<&str> = table.visible().iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e4", "e1", "e3"]);

        table.sort_with(SortKey::PendingLeaves, SortDirection::Descending);
        let ids: Vec<&str> = table.visible().iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3", "e2", "e4"]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut table = SummaryTable::new(vec![row("e1", "ravi", 0, 0), row("e2", "Asha", 0, 0)]);
        table.sort_with(SortKey::EmployeeName, SortDirection::Ascending);
        assert_eq!(table.visible()[0].employee_name, "Asha");
    }

    #[test]
    fn test_search_matches_id_or_name() {
        let mut table = SummaryTable::new(vec![row("EMP-001", "Asha", 0, 0), row("emp-002", "Ravi", 0, 0)]);

        table.set_query("emp-00");
        assert_eq!(table.visible().len(), 2);

        table.set_query("asH");
        let visible = table.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].employee_id, "EMP-001");

        table.set_query("  ");
        assert_eq!(table.visible().len(), 2);
    }

    #[test]
    fn test_export_follows_view() {
        let mut table = SummaryTable::new(vec![row("e1", "Asha", 3, 5), row("e2", "Ravi", 1, 0)]);
        table.set_query("ravi");

        let records = table.export_records();
        assert_eq!(records, vec![row("e2", "Ravi", 1, 0)]);
    }

    #[test]
    fn test_csv_has_header_and_quotes_fields() {
        let table = SummaryTable::new(vec![row("e1", "Rao, \"Asha\"", 3, 5)]);
        let csv = table.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Employee ID,Employee Name,Pending Leaves,Total Leave Days,Extra Leaves (LOP),Sandwich Count,Sandwich Days"
        );
        assert_eq!(lines[1], "e1,\"Rao, \"\"Asha\"\"\",3,5,4,0,0");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_parse_sort_key_variants() {
        assert_eq!(parse_sort_key("pending_leaves").unwrap(), SortKey::PendingLeaves);
        assert_eq!(parse_sort_key("sandwichDays").unwrap(), SortKey::SandwichDays);
        assert_eq!(parse_sort_key("Name").unwrap(), SortKey::EmployeeName);
        assert_eq!(
            parse_sort_key("salary"),
            Err(EngineError::InvalidSortKey {
                value: "salary".to_string()
            })
        );
    }

    #[test]
    fn test_history_is_newest_first_with_fallback() {
        let mut first = request("emp_001", "2025-05-05", "2025-05-05", LeaveStatus::Approved);
        first.request_date = Some(date("2025-04-20"));
        let mut second = request("emp_001", "2025-05-20", "2025-05-21", LeaveStatus::Rejected);
        second.request_date = Some(date("2025-05-10"));
        // No request date: falls back to its start date
        let third = request("emp_001", "2025-05-15", "2025-05-15", LeaveStatus::Pending);
        let mut undated = request("emp_001", "2025-05-01", "2025-05-01", LeaveStatus::Pending);
        undated.from = None;
        let other = request("emp_002", "2025-05-06", "2025-05-06", LeaveStatus::Approved);

        let requests = vec![first, undated, second, third, other];
        let history = build_history("emp_001", &requests, &[], &MonthFilter::All);

        let starts: Vec<Option<NaiveDate>> = history.iter().map(|h| h.request.from).collect();
        assert_eq!(
            starts,
            vec![Some(date("2025-05-15")), Some(date("2025-05-20")), Some(date("2025-05-05")), None]
        );
        assert_eq!(history[1].days, 2);
        assert_eq!(history[3].days, 0);
    }

    #[test]
    fn test_history_month_filter() {
        let requests = vec![
            request("emp_001", "2025-05-05", "2025-05-05", LeaveStatus::Approved),
            request("emp_001", "2025-06-05", "2025-06-05", LeaveStatus::Approved),
        ];

        let history = build_history("emp_001", &requests, &[], &may());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].request.from, Some(date("2025-05-05")));
    }

    #[test]
    fn test_history_annotates_sandwich_reasons() {
        // Saturday 2025-05-10 and Monday 2025-05-12
        let requests = vec![
            request("emp_001", "2025-05-10", "2025-05-10", LeaveStatus::Approved),
            request("emp_001", "2025-05-12", "2025-05-12", LeaveStatus::Approved),
            request("emp_001", "2025-05-20", "2025-05-20", LeaveStatus::Approved),
        ];

        let history = build_history("emp_001", &requests, &[], &MonthFilter::All);
        let flagged: Vec<usize> = history.iter().map(|h| h.sandwich_reasons.len()).collect();
        assert_eq!(flagged, vec![0, 1, 1]);
        assert!(history[1].sandwich_reasons[0].starts_with("Weekend sandwich"));
    }

    #[test]
    fn test_history_reasons_only_on_approved_entries() {
        let mut rejected_copy = request("emp_001", "2025-05-12", "2025-05-12", LeaveStatus::Rejected);
        rejected_copy.request_date = Some(date("2025-05-13"));
        let mut cancelled = request("emp_001", "2025-05-10", "2025-05-12", LeaveStatus::Other);
        cancelled.request_date = Some(date("2025-05-14"));
        let requests = vec![
            request("emp_001", "2025-05-10", "2025-05-10", LeaveStatus::Approved),
            request("emp_001", "2025-05-12", "2025-05-12", LeaveStatus::Approved),
            rejected_copy,
            cancelled,
        ];

        let history = build_history("emp_001", &requests, &[], &MonthFilter::All);
        assert_eq!(history.len(), 4);
        for entry in &history {
            assert_eq!(
                entry.sandwich_reasons.is_empty(),
                !entry.request.is_approved(),
                "status {}",
                entry.request.status
            );
        }
    }

    #[test]
    fn test_history_for_unknown_employee_is_empty() {
        let requests = vec![request("emp_001", "2025-05-05", "2025-05-05", LeaveStatus::Approved)];
        assert!(build_history("emp_404", &requests, &[], &MonthFilter::All).is_empty());
    }
}
