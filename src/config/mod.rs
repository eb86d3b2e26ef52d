//! Leave policy configuration.
//!
//! The policy replaces what would otherwise be hard-coded constants: the
//! month the leave year starts in, the monthly accrual, the days charged per
//! sandwich cluster, and the reference timezone for date normalization.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::PolicyLoader;
//!
//! let loader = PolicyLoader::load("./config/leave_policy.yaml").unwrap();
//! println!("Leave year starts in month {}", loader.policy().leave_year_start_month);
//! ```

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{
    DEFAULT_LEAVE_YEAR_START_MONTH, DEFAULT_MAX_RANGE_DAYS, DEFAULT_MONTHLY_ACCRUAL, DEFAULT_REFERENCE_UTC_OFFSET_MINUTES,
    DEFAULT_SANDWICH_CLUSTER_WEIGHT, LeavePolicy,
};
