//! Inclusive date ranges and lenient date parsing.
//!
//! This module provides [`DateSpan`], the normalized inclusive day range used
//! by the ledger and the sandwich detector, and the helpers that turn raw
//! upstream values into calendar dates without ever failing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days with `start <= end`.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::DateSpan;
/// use chrono::NaiveDate;
///
/// let span = DateSpan::new(
///     NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(span.days(), 3);
/// assert_eq!(span.iter().count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Creates a span, or returns `None` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a one-day span.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First day of the span.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the span.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of days covered.
    pub fn days(&self) -> u32 {
        let between = (self.end - self.start).num_days();
        u32::try_from(between).map_or(u32::MAX, |d| d.saturating_add(1))
    }

    /// Returns true if `day` falls inside the span.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns true if the two spans share at least one day.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns the days shared with `other`, if any.
    pub fn intersection(&self, other: &DateSpan) -> Option<DateSpan> {
        DateSpan::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Iterates every day of the span in order.
    pub fn iter(&self) -> DayIter {
        DayIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateSpan {
    type Item = NaiveDate;
    type IntoIter = DayIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DateSpan {
    type Item = NaiveDate;
    type IntoIter = DayIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the days of a [`DateSpan`].
///
/// Cloning the iterator restarts enumeration from the clone point, so a
/// fresh clone taken before iteration replays the whole range.
#[derive(Debug, Clone)]
pub struct DayIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayIter {
    fn empty() -> Self {
        Self {
            next: None,
            end: NaiveDate::MIN,
        }
    }
}

impl Iterator for DayIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

/// Calculates the inclusive number of leave days between two dates.
///
/// Missing dates and reversed ranges contribute zero days.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::calculate_leave_days;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2025, 5, 12);
/// assert_eq!(calculate_leave_days(d, d), 1);
///
/// let later = NaiveDate::from_ymd_opt(2025, 5, 16);
/// assert_eq!(calculate_leave_days(d, later), 5);
/// assert_eq!(calculate_leave_days(later, d), 0);
/// assert_eq!(calculate_leave_days(None, later), 0);
/// ```
pub fn calculate_leave_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> u32 {
    from.zip(to)
        .and_then(|(from, to)| DateSpan::new(from, to))
        .map_or(0, |span| span.days())
}

/// Enumerates every day from `from` to `to` inclusive.
///
/// Missing dates and reversed ranges yield an empty iterator.
pub fn expand_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> DayIter {
    from.zip(to)
        .and_then(|(from, to)| DateSpan::new(from, to))
        .map_or_else(DayIter::empty, |span| span.iter())
}

/// Parses an upstream date value into a calendar date.
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or with a space
/// separator), and RFC 3339 timestamps. Timestamps carrying an offset are
/// first moved into `reference`, so a late-evening UTC timestamp lands on
/// the correct local day. Returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::parse_calendar_date;
/// use chrono::{FixedOffset, NaiveDate};
///
/// let ist = FixedOffset::east_opt(330 * 60).unwrap();
/// assert_eq!(
///     parse_calendar_date("2025-05-12", ist),
///     NaiveDate::from_ymd_opt(2025, 5, 12)
/// );
/// // 18:30 UTC is midnight the next day at UTC+05:30
/// assert_eq!(
///     parse_calendar_date("2025-05-12T18:30:00.000Z", ist),
///     NaiveDate::from_ymd_opt(2025, 5, 13)
/// );
/// assert_eq!(parse_calendar_date("not a date", ist), None);
/// ```
pub fn parse_calendar_date(raw: &str, reference: FixedOffset) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&reference).date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}
