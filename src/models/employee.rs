//! Employee model.
//!
//! Only the identifier and display name are needed here; the rest of the
//! employee directory belongs to the host application.

use serde::{Deserialize, Serialize};

/// Label rendered when an employee's name cannot be resolved.
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown";

/// Represents an employee in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name, if the directory has one.
    #[serde(default)]
    pub name: Option<String>,
}

impl Employee {
    /// Creates a directory entry with a known name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the name to show in reports.
    ///
    /// Missing or blank names render as [`UNKNOWN_EMPLOYEE_NAME`].
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::Employee;
    ///
    /// let named = Employee::new("emp_001", "Asha Rao");
    /// assert_eq!(named.display_name(), "Asha Rao");
    ///
    /// let unnamed = Employee { id: "emp_002".to_string(), name: None };
    /// assert_eq!(unnamed.display_name(), "Unknown");
    /// ```
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_EMPLOYEE_NAME,
        }
    }
}
