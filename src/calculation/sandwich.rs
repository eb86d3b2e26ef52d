//! Sandwich leave detection.
//!
//! A sandwich is approved leave placed on both sides of a non-working gap so
//! that a short request buys a long break. Two patterns are recognised:
//!
//! - **Holiday-anchored**: the day before a holiday range and the day after
//!   it are both covered by approved leave.
//! - **Weekend-anchored**: a Saturday and the following Monday are both
//!   covered by approved leave.
//!
//! Matches are deduplicated by [`ClusterKey`], so a holiday range or a
//! Saturday counts at most once however many requests touch it. Both the
//! aggregate score and the per-request explanation are derived from
//! [`detect_clusters`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LeavePolicy;
use crate::models::{Holiday, LeaveRequest, MonthFilter};

use super::date_range::DateSpan;

/// Identity of one sandwich cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterKey {
    /// Leave on both sides of a holiday range.
    Holiday {
        /// First day of the holiday.
        start: NaiveDate,
        /// Last day of the holiday.
        end: NaiveDate,
    },
    /// Leave on a Saturday and the following Monday.
    Weekend {
        /// The Saturday.
        saturday: NaiveDate,
    },
}

impl ClusterKey {
    /// The two leave days that form the sandwich.
    ///
    /// For a holiday this is the day before and the day after the range; for
    /// a weekend it is the Saturday and the Monday.
    pub fn bridging_days(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            ClusterKey::Holiday { start, end } => Some((start.pred_opt()?, end.succ_opt()?)),
            ClusterKey::Weekend { saturday } => {
                Some((saturday, saturday.checked_add_days(chrono::Days::new(2))?))
            }
        }
    }

    /// Returns true if the cluster's anchor falls inside `filter`.
    ///
    /// Holiday clusters match when the holiday range overlaps the month;
    /// weekend clusters match on the Saturday's date.
    pub fn falls_within(&self, filter: &MonthFilter) -> bool {
        match *self {
            ClusterKey::Holiday { start, end } => {
                DateSpan::new(start, end).is_some_and(|span| filter.overlaps(&span))
            }
            ClusterKey::Weekend { saturday } => filter.contains(saturday),
        }
    }
}

/// A detected cluster with a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandwichCluster {
    /// The deduplication key.
    pub key: ClusterKey,
    /// Holiday name, or "Weekend" for weekend clusters.
    pub label: String,
}

impl SandwichCluster {
    /// Explains the cluster in one sentence.
    pub fn reason(&self) -> String {
        match self.key {
            ClusterKey::Holiday { start, end } => {
                let range = if start == end {
                    start.to_string()
                } else {
                    format!("{} to {}", start, end)
                };
                match self.key.bridging_days() {
                    Some((before, after)) => format!(
                        "Holiday sandwich: leave on {} and {} around {} ({})",
                        before, after, self.label, range
                    ),
                    None => format!("Holiday sandwich around {} ({})", self.label, range),
                }
            }
            ClusterKey::Weekend { saturday } => match self.key.bridging_days() {
                Some((_, monday)) => format!(
                    "Weekend sandwich: leave on Saturday {} and Monday {}",
                    saturday, monday
                ),
                None => format!("Weekend sandwich: leave on Saturday {}", saturday),
            },
        }
    }
}

/// Aggregate sandwich result for one employee and month filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SandwichScore {
    /// Number of distinct clusters.
    pub count: u32,
    /// Days charged: `count` times the policy weight.
    pub days: u32,
    /// The counted clusters, in key order.
    pub clusters: Vec<SandwichCluster>,
}

/// Every day covered by approved leave.
#[derive(Debug, Clone, Default)]
pub struct LeaveDaySet {
    days: BTreeSet<NaiveDate>,
}

impl LeaveDaySet {
    /// Builds the set from approved requests with usable dates.
    pub fn from_approved<'a, I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaveRequest>,
    {
        let days = leaves
            .into_iter()
            .filter(|leave| leave.is_approved())
            .filter_map(LeaveRequest::span)
            .flat_map(|span| span.iter())
            .collect();
        Self { days }
    }

    /// Builds the set like [`from_approved`](Self::from_approved), keeping
    /// only days inside one of `windows`.
    pub fn from_approved_within<'a, I>(leaves: I, windows: &[DateSpan]) -> Self
    where
        I: IntoIterator<Item = &'a LeaveRequest>,
    {
        let days = leaves
            .into_iter()
            .filter(|leave| leave.is_approved())
            .filter_map(LeaveRequest::span)
            .flat_map(|span| {
                windows
                    .iter()
                    .filter_map(move |window| span.intersection(window))
            })
            .flat_map(|span| span.iter())
            .collect();
        Self { days }
    }

    /// Returns true if `day` is on approved leave.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    /// Iterates covered days in order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }
}

fn holiday_sandwich(days: &LeaveDaySet, holiday: &DateSpan) -> Option<ClusterKey> {
    let key = ClusterKey::Holiday {
        start: holiday.start(),
        end: holiday.end(),
    };
    let (before, after) = key.bridging_days()?;
    (days.covers(before) && days.covers(after)).then_some(key)
}

fn weekend_sandwich(days: &LeaveDaySet, day: NaiveDate) -> Option<ClusterKey> {
    if day.weekday() != Weekday::Sat {
        return None;
    }
    let key = ClusterKey::Weekend { saturday: day };
    let (saturday, monday) = key.bridging_days()?;
    (days.covers(saturday) && days.covers(monday)).then_some(key)
}

/// Finds every distinct sandwich cluster for a set of leave days.
///
/// Holidays with missing or reversed dates are skipped. Holidays sharing the
/// same range collapse into one cluster labelled with the first name seen.
pub fn detect_clusters(days: &LeaveDaySet, holidays: &[Holiday]) -> Vec<SandwichCluster> {
    let mut clusters: BTreeMap<ClusterKey, SandwichCluster> = BTreeMap::new();

    for holiday in holidays {
        let Some(span) = holiday.span() else {
            continue;
        };
        if let Some(key) = holiday_sandwich(days, &span) {
            clusters.entry(key).or_insert_with(|| SandwichCluster {
                key,
                label: holiday.name.clone(),
            });
        }
    }

    for key in days.iter().filter_map(|day| weekend_sandwich(days, day)) {
        clusters.entry(key).or_insert_with(|| SandwichCluster {
            key,
            label: "Weekend".to_string(),
        });
    }

    clusters.into_values().collect()
}

/// Scores sandwich clusters for one employee's approved leave.
///
/// Only clusters anchored inside `filter` are counted. Each cluster is
/// charged `policy.sandwich_cluster_weight` days.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::compute_sandwich_leaves;
/// use leave_engine::config::LeavePolicy;
/// use leave_engine::models::{Holiday, LeaveRequest, LeaveStatus, MonthFilter};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 12, d);
/// let one_day = |d| LeaveRequest {
///     employee_id: "emp_001".to_string(),
///     from: day(d),
///     to: day(d),
///     status: LeaveStatus::Approved,
///     leave_type: "Casual".to_string(),
///     reason: String::new(),
///     request_date: None,
/// };
/// let christmas = Holiday {
///     name: "Christmas".to_string(),
///     start_date: day(25),
///     end_date: day(25),
///     description: String::new(),
/// };
///
/// let score = compute_sandwich_leaves(
///     &[one_day(24), one_day(26)],
///     &[christmas],
///     &MonthFilter::All,
///     &LeavePolicy::default(),
/// );
/// assert_eq!(score.count, 1);
/// assert_eq!(score.days, 2);
/// ```
pub fn compute_sandwich_leaves<'a, I>(
    approved: I,
    holidays: &[Holiday],
    filter: &MonthFilter,
    policy: &LeavePolicy,
) -> SandwichScore
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let days = match detection_windows(filter, holidays) {
        Some(windows) => LeaveDaySet::from_approved_within(approved, &windows),
        None => LeaveDaySet::from_approved(approved),
    };
    let clusters: Vec<SandwichCluster> = detect_clusters(&days, holidays)
        .into_iter()
        .filter(|cluster| cluster.key.falls_within(filter))
        .collect();

    let count = u32::try_from(clusters.len()).unwrap_or(u32::MAX);
    let days = count.saturating_mul(policy.sandwich_cluster_weight);

    debug!(
        filter = %filter,
        clusters = count,
        days,
        "Sandwich clusters scored"
    );

    SandwichScore {
        count,
        days,
        clusters,
    }
}

/// The days a month filter can draw clusters from.
///
/// The month through the Monday after a month-end Saturday, plus the two
/// neighbours of every holiday overlapping the month. `None` for
/// [`MonthFilter::All`].
fn detection_windows(filter: &MonthFilter, holidays: &[Holiday]) -> Option<Vec<DateSpan>> {
    let month = filter.span()?;
    let end = month
        .end()
        .checked_add_days(chrono::Days::new(2))
        .unwrap_or(month.end());

    let neighbours = holidays
        .iter()
        .filter_map(Holiday::span)
        .filter(|holiday| holiday.overlaps(&month))
        .filter_map(|holiday| {
            ClusterKey::Holiday {
                start: holiday.start(),
                end: holiday.end(),
            }
            .bridging_days()
        })
        .flat_map(|(before, after)| [DateSpan::single(before), DateSpan::single(after)]);

    Some(DateSpan::new(month.start(), end).into_iter().chain(neighbours).collect())
}

/// Explains why one leave request is part of a sandwich.
///
/// Uses the same cluster detection as [`compute_sandwich_leaves`] over the
/// employee's approved leave, then keeps the clusters whose bridging leave
/// days fall inside `[leave_from, leave_to]`. Returns an empty list for a
/// malformed range.
pub fn sandwich_reasons<'a, I>(
    approved_for_employee: I,
    holidays: &[Holiday],
    leave_from: Option<NaiveDate>,
    leave_to: Option<NaiveDate>,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let Some(request_span) = leave_from
        .zip(leave_to)
        .and_then(|(from, to)| DateSpan::new(from, to))
    else {
        return Vec::new();
    };

    let days = LeaveDaySet::from_approved(approved_for_employee);
    reasons_within(&detect_clusters(&days, holidays), &request_span)
}

/// Reasons for the clusters whose bridging leave days fall inside `span`.
pub(crate) fn reasons_within(clusters: &[SandwichCluster], span: &DateSpan) -> Vec<String> {
    clusters
        .iter()
        .filter(|cluster| {
            cluster
                .key
                .bridging_days()
                .is_some_and(|(before, after)| span.contains(before) || span.contains(after))
        })
        .map(SandwichCluster::reason)
        .collect()
}
