//! Configuration types for the leave policy.
//!
//! This module contains the strongly-typed policy structure that is
//! deserialized from the YAML policy file.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default first month of the leave year (April).
pub const DEFAULT_LEAVE_YEAR_START_MONTH: u32 = 4;

/// Default leave granted per month.
pub const DEFAULT_MONTHLY_ACCRUAL: u32 = 1;

/// Default days charged per sandwich cluster.
pub const DEFAULT_SANDWICH_CLUSTER_WEIGHT: u32 = 2;

/// Default reference offset, UTC+05:30.
pub const DEFAULT_REFERENCE_UTC_OFFSET_MINUTES: i32 = 330;

/// Default longest leave or holiday range accepted from upstream, in days.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 366;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Tenant-level leave policy.
///
/// `monthly_accrual` is both the amount granted per visited month in the
/// ledger and the free allotment per month before leave counts as loss of pay.
///
/// # Example
///
/// ```
/// use leave_engine::config::LeavePolicy;
///
/// let policy: LeavePolicy = serde_yaml::from_str("leave_year_start_month: 1").unwrap();
/// assert_eq!(policy.leave_year_start_month, 1);
/// assert_eq!(policy.monthly_accrual, 1);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// First month of the leave year, 1 = January through 12 = December.
    pub leave_year_start_month: u32,
    /// Leave granted per month, and the per-month free allotment.
    pub monthly_accrual: u32,
    /// Days charged for each sandwich cluster.
    pub sandwich_cluster_weight: u32,
    /// Offset (minutes east of UTC) used to turn timestamps into dates.
    pub reference_utc_offset_minutes: i32,
    /// Longest inclusive range an upstream leave or holiday may cover.
    /// Longer ranges are treated as malformed.
    pub max_range_days: u32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            leave_year_start_month: DEFAULT_LEAVE_YEAR_START_MONTH,
            monthly_accrual: DEFAULT_MONTHLY_ACCRUAL,
            sandwich_cluster_weight: DEFAULT_SANDWICH_CLUSTER_WEIGHT,
            reference_utc_offset_minutes: DEFAULT_REFERENCE_UTC_OFFSET_MINUTES,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

impl LeavePolicy {
    /// Returns a default policy with a different leave-year start month.
    pub fn with_start_month(start_month: u32) -> Self {
        Self {
            leave_year_start_month: start_month,
            ..Self::default()
        }
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=12).contains(&self.leave_year_start_month) {
            return Err(EngineError::InvalidPolicy {
                field: "leave_year_start_month".to_string(),
                message: format!(
                    "must be between 1 and 12, got {}",
                    self.leave_year_start_month
                ),
            });
        }

        if self.reference_utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            return Err(EngineError::InvalidPolicy {
                field: "reference_utc_offset_minutes".to_string(),
                message: format!(
                    "must be within +/-{} minutes, got {}",
                    MINUTES_PER_DAY - 1,
                    self.reference_utc_offset_minutes
                ),
            });
        }

        if self.max_range_days == 0 {
            return Err(EngineError::InvalidPolicy {
                field: "max_range_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the fixed reference timezone.
    ///
    /// Falls back to UTC if the offset is out of range; [`validate`](Self::validate)
    /// rejects such policies at load time.
    pub fn reference_offset(&self) -> FixedOffset {
        self.reference_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Returns today's date in the reference timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.reference_offset())
            .date_naive()
    }
}
