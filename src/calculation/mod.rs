//! Calculation logic for the Leave Engine.
//!
//! This module contains the pure computations behind the leave report:
//! leave-year resolution, inclusive date ranges and lenient date parsing,
//! the month-by-month accrual ledger, sandwich-leave detection, and the
//! per-employee summary and history views built from them.

mod accrual_ledger;
mod date_range;
mod leave_year;
mod report;
mod sandwich;

pub use accrual_ledger::{LedgerWalk, MonthBucket, compute_available_leaves, walk_ledger};
pub use date_range::{
    DateSpan, DayIter, calculate_leave_days, expand_range, parse_calendar_date,
};
pub use leave_year::{LeaveYear, MonthIter, month_start, resolve_leave_year};
pub use report::{
    CSV_HEADERS, SortDirection, SortKey, SortState, SummaryTable, build_history,
    build_summaries, parse_sort_key,
};
pub use sandwich::{
    ClusterKey, LeaveDaySet, SandwichCluster, SandwichScore, compute_sandwich_leaves,
    detect_clusters, sandwich_reasons,
};
