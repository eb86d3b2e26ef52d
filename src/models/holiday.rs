//! Company holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::DateSpan;

/// A company-wide holiday covering an inclusive date range.
///
/// # Example
///
/// ```
/// use leave_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let christmas = Holiday {
///     name: "Christmas".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 12, 25),
///     end_date: NaiveDate::from_ymd_opt(2025, 12, 25),
///     description: String::new(),
/// };
/// assert_eq!(christmas.span().unwrap().days(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The holiday's name (e.g. "Diwali").
    pub name: String,
    /// First day of the holiday (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Last day of the holiday (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

impl Holiday {
    /// Returns the holiday's span, or `None` if its dates are unusable.
    pub fn span(&self) -> Option<DateSpan> {
        DateSpan::new(self.start_date?, self.end_date?)
    }
}
