//! Errors for the statistics engine
//!
//! Two layers. [`StatsError`] is what the pure engine returns: small, typed,
//! and matched on by callers. [`ShewhartError`] is the structured,
//! serializable form handed to tool clients, with a machine-readable code
//! and an optional suggestion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error type for engine computations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The sample (or derived series) is too short for the statistic.
    #[error("{what} requires at least {needed} values, got {got}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    /// A value lies outside the range the statistical model accepts.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Malformed input text. `entry` is the offending literal.
    #[error("Invalid entry '{entry}': {reason}")]
    Parse { entry: String, reason: String },
}

impl StatsError {
    pub fn insufficient(what: &'static str, needed: usize, got: usize) -> Self {
        StatsError::InsufficientData { what, needed, got }
    }

    pub fn domain(details: impl Into<String>) -> Self {
        StatsError::Domain(details.into())
    }

    pub fn parse(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::Parse {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            StatsError::InsufficientData { .. } => codes::INSUFFICIENT_DATA,
            StatsError::Domain(_) => codes::DOMAIN_ERROR,
            StatsError::Parse { .. } => codes::PARSE_ERROR,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Part of a report could not be computed
    Warning,
    /// The requested computation failed
    Error,
    /// The engine itself is broken
    Fatal,
}

/// Structured error for tool clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShewhartError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Offending input literal, for parse errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl ShewhartError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            entry: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: attach the offending literal
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn insufficient_data(details: impl Into<String>) -> Self {
        Self::new(codes::INSUFFICIENT_DATA, details)
            .with_suggestion("Provide at least two data points")
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn parse_error(entry: &str, details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, details)
            .with_entry(entry)
            .with_suggestion("Expected format is interval:frequency (e.g., 1-2:3) or comma-separated numbers")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use list_functions to see available functions")
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn not_found(name: &str) -> Self {
        Self::new(codes::NOT_FOUND, format!("No function named '{}'", name))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for ShewhartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ShewhartError {}

impl From<StatsError> for ShewhartError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::InsufficientData { .. } => Self::insufficient_data(err.to_string()),
            StatsError::Domain(s) => Self::domain_error(s),
            StatsError::Parse { ref entry, .. } => Self::parse_error(entry, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = StatsError::insufficient("describe", 2, 1);
        assert_eq!(err.to_string(), "describe requires at least 2 values, got 1");
        assert_eq!(err.code(), codes::INSUFFICIENT_DATA);
    }

    #[test]
    fn test_parse_error_keeps_entry() {
        let err: ShewhartError = StatsError::parse("1-x:3", "bad bound").into();
        assert_eq!(err.code, codes::PARSE_ERROR);
        assert_eq!(err.entry.as_deref(), Some("1-x:3"));
        assert!(err.message.contains("1-x:3"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: ShewhartError = StatsError::domain("p-bar 1.5 outside [0, 1]").into();
        assert_eq!(err.code, codes::DOMAIN_ERROR);
        assert_eq!(err.severity, Severity::Error);
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let err = ShewhartError::new(codes::INTERNAL, "boom");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("suggestion"));
        assert!(!json.contains("entry"));
        assert!(json.contains("\"severity\":\"error\""));
    }
}
