//! Application state for the Leave Engine API.

use std::sync::Arc;

use crate::config::{LeavePolicy, PolicyLoader};

/// Shared application state.
///
/// Holds the loaded leave policy. The policy is read-only after startup, so
/// handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    policy: Arc<PolicyLoader>,
}

impl AppState {
    /// Creates a new application state with the given policy loader.
    pub fn new(policy: PolicyLoader) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Returns the active leave policy.
    pub fn policy(&self) -> &LeavePolicy {
        self.policy.policy()
    }
}
