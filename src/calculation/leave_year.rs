//! Leave-year window resolution.
//!
//! A leave year is a twelve-month accrual cycle beginning on the first day of
//! a configurable start month. It need not line up with the calendar year.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The leave-year window containing some reference date.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::resolve_leave_year;
/// use chrono::NaiveDate;
///
/// // February 2026 with an April start belongs to the 2025-26 leave year
/// let year = resolve_leave_year(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(), 4);
/// assert_eq!(year.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// assert_eq!(year.end_date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveYear {
    /// First day of the leave year.
    pub start_date: NaiveDate,
    /// Last day of the leave year (start + 12 months - 1 day).
    pub end_date: NaiveDate,
}

impl LeaveYear {
    /// Returns true if `date` falls inside the leave year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Iterates the first day of each month from the leave-year start up to
    /// and including the month containing `reference`.
    ///
    /// Yields nothing if `reference` precedes the leave year, and stops at
    /// the leave-year end if `reference` lies beyond it.
    pub fn months_through(&self, reference: NaiveDate) -> MonthIter {
        let last = month_start(reference.min(self.end_date));
        MonthIter {
            next: (reference >= self.start_date).then_some(self.start_date),
            last,
        }
    }
}

/// Iterator over month starts; see [`LeaveYear::months_through`].
#[derive(Debug, Clone)]
pub struct MonthIter {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for MonthIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.checked_add_months(Months::new(1));
        Some(current)
    }
}

/// Returns the first day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.day0()))
}

/// Resolves the leave year that contains `reference`.
///
/// `start_month` is 1-based (1 = January). If the reference month precedes
/// the start month, the leave year began in the previous calendar year.
/// Out-of-range start months are clamped into 1..=12 so that every input
/// yields a window.
pub fn resolve_leave_year(reference: NaiveDate, start_month: u32) -> LeaveYear {
    let start_month = start_month.clamp(1, 12);
    let start_year = if reference.month() < start_month {
        reference.year() - 1
    } else {
        reference.year()
    };

    let start_date = NaiveDate::from_ymd_opt(start_year, start_month, 1).unwrap_or(NaiveDate::MIN);
    let end_date = start_date
        .checked_add_months(Months::new(12))
        .and_then(|next_start| next_start.pred_opt())
        .unwrap_or(NaiveDate::MAX);

    LeaveYear {
        start_date,
        end_date,
    }
}
