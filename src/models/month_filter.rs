//! Month filter used to scope report metrics.

use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculation::DateSpan;
use crate::error::{EngineError, EngineResult};

/// Restricts monthly metrics to one calendar month, or to everything.
///
/// Parses from `"All"` (case-insensitive) or `"YYYY-MM"`.
///
/// # Example
///
/// ```
/// use leave_engine::models::MonthFilter;
/// use chrono::NaiveDate;
///
/// let may: MonthFilter = "2025-05".parse().unwrap();
/// assert!(may.contains(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()));
/// assert!(!may.contains(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
///
/// let all: MonthFilter = "all".parse().unwrap();
/// assert_eq!(all, MonthFilter::All);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthFilter {
    /// No restriction.
    #[default]
    All,
    /// A single calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month number, 1 = January.
        month: u32,
    },
}

impl MonthFilter {
    /// Builds a single-month filter, validating the month number.
    pub fn month(year: i32, month: u32) -> EngineResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidMonthFilter {
                value: format!("{:04}-{:02}", year, month),
            });
        }
        Ok(MonthFilter::Month { year, month })
    }

    /// Returns the inclusive span of the filtered month, or `None` for `All`.
    pub fn span(&self) -> Option<DateSpan> {
        match *self {
            MonthFilter::All => None,
            MonthFilter::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
                DateSpan::new(first, last)
            }
        }
    }

    /// Returns true if `date` falls inside the filter.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month { .. } => self.span().is_some_and(|month| month.contains(date)),
        }
    }

    /// Returns true if any day of `span` falls inside the filter.
    pub fn overlaps(&self, span: &DateSpan) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month { .. } => self.span().is_some_and(|month| month.overlaps(span)),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }

        let invalid = || EngineError::InvalidMonthFilter {
            value: s.to_string(),
        };

        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        MonthFilter::month(year, month).map_err(|_| invalid())
    }
}

impl std::fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthFilter::All => write!(f, "All"),
            MonthFilter::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl TryFrom<String> for MonthFilter {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthFilter> for String {
    fn from(filter: MonthFilter) -> Self {
        filter.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_all_is_case_insensitive() {
        assert_eq!("All".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(" ALL ".parse::<MonthFilter>().unwrap(), MonthFilter::All);
    }

    #[test]
    fn test_parse_year_month() {
        let filter: MonthFilter = "2025-12".parse().unwrap();
        assert_eq!(
            filter,
            MonthFilter::Month {
                year: 2025,
                month: 12
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "May", "2025-13", "2025-00", "25-05", "2025/05", "2025-5"] {
            match raw.parse::<MonthFilter>() {
                Err(EngineError::InvalidMonthFilter { value }) => assert_eq!(value, raw),
                other => panic!("expected InvalidMonthFilter for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_display_round_trips() {
        let filter = MonthFilter::month(2026, 2).unwrap();
        assert_eq!(filter.to_string(), "2026-02");
        assert_eq!(MonthFilter::All.to_string(), "All");
    }

    #[test]
    fn test_span_covers_whole_month() {
        let span = MonthFilter::month(2024, 2).unwrap().span().unwrap();
        assert_eq!(span.start(), date("2024-02-01"));
        assert_eq!(span.end(), date("2024-02-29"));
        assert!(MonthFilter::All.span().is_none());
    }

    #[test]
    fn test_overlaps_partial_range() {
        let may = MonthFilter::month(2025, 5).unwrap();
        let straddling = DateSpan::new(date("2025-04-29"), date("2025-05-02")).unwrap();
        let june = DateSpan::new(date("2025-06-01"), date("2025-06-03")).unwrap();

        assert!(may.overlaps(&straddling));
        assert!(!may.overlaps(&june));
        assert!(MonthFilter::All.overlaps(&june));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let filter: MonthFilter = serde_json::from_str(r#""2025-05""#).unwrap();
        assert_eq!(filter, MonthFilter::month(2025, 5).unwrap());
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#""2025-05""#);
        assert!(serde_json::from_str::<MonthFilter>(r#""nope""#).is_err());
    }
}
