//! Error types for the leave engine.
//!
//! The calculation layer is total and never fails. Errors only arise at the
//! edges: loading the leave policy, or parsing user-supplied selectors such
//! as a month filter or a sort key.

use thiserror::Error;

/// The main error type for the leave engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/leave_policy.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/leave_policy.yaml"
/// );
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A leave policy value is outside its allowed range.
    #[error("Invalid leave policy field '{field}': {message}")]
    InvalidPolicy {
        /// The offending policy field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A month filter was neither `All` nor `YYYY-MM`.
    #[error("Invalid month filter '{value}': expected \"All\" or \"YYYY-MM\"")]
    InvalidMonthFilter {
        /// The rejected input.
        value: String,
    },

    /// A sort key did not name a summary column.
    #[error("Invalid sort key '{value}'")]
    InvalidSortKey {
        /// The rejected input.
        value: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
