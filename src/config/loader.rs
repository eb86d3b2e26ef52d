//! Policy loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading the leave
//! policy from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::LeavePolicy;

/// Loads and provides access to the leave policy.
///
/// # File Format
///
/// ```text
/// leave_year_start_month: 4        # April
/// monthly_accrual: 1
/// sandwich_cluster_weight: 2
/// reference_utc_offset_minutes: 330
/// max_range_days: 366
/// ```
///
/// Every key is optional; missing keys take the [`LeavePolicy`] defaults.
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::PolicyLoader;
///
/// let loader = PolicyLoader::load("./config/leave_policy.yaml")?;
/// assert!(loader.policy().validate().is_ok());
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    policy: LeavePolicy,
}

impl PolicyLoader {
    /// Loads the policy from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `PolicyLoader` on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML
    /// - A value is outside its allowed range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses a policy from YAML text. `source` names the text in errors.
    pub fn from_yaml_str(content: &str, source: &str) -> EngineResult<Self> {
        let policy: LeavePolicy =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        Self::from_policy(policy)
    }

    /// Wraps an already-built policy after validating it.
    pub fn from_policy(policy: LeavePolicy) -> EngineResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }
}
