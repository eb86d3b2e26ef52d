//! Month-by-month leave accrual ledger.
//!
//! The ledger is never stored. It is folded from the full leave history on
//! every query: each month from the leave-year start to the reference month
//! grants the monthly accrual, then subtracts the approved leave that starts
//! in that month. The balance is floored at zero after every month, and a
//! shortfall is forgiven rather than carried forward.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LeavePolicy;
use crate::models::LeaveRequest;

use super::leave_year::{LeaveYear, month_start, resolve_leave_year};

/// One visited month of the ledger walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// First day of the month.
    pub month_start: NaiveDate,
    /// Leave granted this month.
    pub accrued: u32,
    /// Approved leave days whose start date falls in this month.
    pub used: u32,
    /// Shortfall clamped away by the zero floor.
    pub forgiven: u32,
    /// Balance after applying this month.
    pub balance: u32,
}

/// The full per-month trace of a ledger computation.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::walk_ledger;
/// use leave_engine::config::LeavePolicy;
/// use chrono::NaiveDate;
///
/// let walk = walk_ledger(&[], NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(), &LeavePolicy::default());
/// assert_eq!(walk.buckets.len(), 3); // April, May, June
/// assert_eq!(walk.balance(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerWalk {
    /// The leave year that was walked.
    pub leave_year: LeaveYear,
    /// Visited months, oldest first.
    pub buckets: Vec<MonthBucket>,
}

impl LedgerWalk {
    /// Balance after the last visited month, or zero if none were visited.
    pub fn balance(&self) -> u32 {
        self.buckets.last().map_or(0, |bucket| bucket.balance)
    }

    /// Total shortfall forgiven across the walk.
    pub fn total_forgiven(&self) -> u32 {
        self.buckets
            .iter()
            .fold(0u32, |total, bucket| total.saturating_add(bucket.forgiven))
    }
}

/// Walks the leave year up to `reference`, returning every month bucket.
///
/// Only approved requests are consumed; other statuses are ignored even if
/// passed in. A request is charged in full to the month its start date falls
/// in. Requests with unusable dates contribute nothing.
pub fn walk_ledger<'a, I>(leaves: I, reference: NaiveDate, policy: &LeavePolicy) -> LedgerWalk
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let leave_year = resolve_leave_year(reference, policy.leave_year_start_month);

    let mut usage: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for span in leaves
        .into_iter()
        .filter(|leave| leave.is_approved())
        .filter_map(LeaveRequest::span)
    {
        let used = usage.entry(month_start(span.start())).or_insert(0);
        *used = used.saturating_add(span.days());
    }

    let accrued = policy.monthly_accrual;
    let buckets: Vec<MonthBucket> = leave_year
        .months_through(reference)
        .scan(0u32, |balance, month| {
            let used = usage.get(&month).copied().unwrap_or(0);
            let available = balance.saturating_add(accrued);
            let forgiven = used.saturating_sub(available);
            *balance = available.saturating_sub(used);

            Some(MonthBucket {
                month_start: month,
                accrued,
                used,
                forgiven,
                balance: *balance,
            })
        })
        .collect();

    let walk = LedgerWalk {
        leave_year,
        buckets,
    };

    debug!(
        leave_year_start = %walk.leave_year.start_date,
        reference = %reference,
        months = walk.buckets.len(),
        balance = walk.balance(),
        forgiven = walk.total_forgiven(),
        "Ledger walk completed"
    );

    walk
}

/// Computes the available leave balance as of `reference`.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::compute_available_leaves;
/// use leave_engine::config::LeavePolicy;
/// use leave_engine::models::{LeaveRequest, LeaveStatus};
/// use chrono::NaiveDate;
///
/// // April start, mid-June reference, one approved 3-day leave in May:
/// // April +1 = 1, May +1 -3 => 0 (floored), June +1 = 1
/// let leave = LeaveRequest {
///     employee_id: "emp_001".to_string(),
///     from: NaiveDate::from_ymd_opt(2025, 5, 14),
///     to: NaiveDate::from_ymd_opt(2025, 5, 16),
///     status: LeaveStatus::Approved,
///     leave_type: "Casual".to_string(),
///     reason: String::new(),
///     request_date: None,
/// };
/// let balance = compute_available_leaves(
///     &[leave],
///     NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
///     &LeavePolicy::with_start_month(4),
/// );
/// assert_eq!(balance, 1);
/// ```
pub fn compute_available_leaves<'a, I>(leaves: I, reference: NaiveDate, policy: &LeavePolicy) -> u32
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    walk_ledger(leaves, reference, policy).balance()
}
