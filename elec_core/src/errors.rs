//! # Error Types
//!
//! Structured error types for elec_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Only true input problems and table exhaustion are errors. Compliance
//! findings (tight derating, breaker larger than conductor ampacity, excessive
//! voltage drop) are returned as [`ComplianceWarning`](crate::compliance::ComplianceWarning)
//! data on a complete result.
//!
//! ## Example
//!
//! ```rust
//! use elec_core::errors::{CalcError, CalcResult};
//!
//! fn validate_load(load_amps: f64) -> CalcResult<()> {
//!     if load_amps < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "load_amps".to_string(),
//!             value: load_amps.to_string(),
//!             reason: "Load current cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for elec_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A conductor size label could not be matched to the standard size list
    #[error("Unknown conductor size: '{label}'")]
    UnknownConductorSize { label: String },

    /// The requested value exceeds the largest entry of a reference table
    #[error("Table lookup exhausted: {table} has no entry for {requested} (largest: {largest})")]
    TableExhausted {
        table: String,
        requested: String,
        largest: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownConductorSize error
    pub fn unknown_conductor_size(label: impl Into<String>) -> Self {
        CalcError::UnknownConductorSize {
            label: label.into(),
        }
    }

    /// Create a TableExhausted error
    pub fn table_exhausted(table: impl Into<String>, requested: impl Into<String>, largest: impl Into<String>) -> Self {
        CalcError::TableExhausted {
            table: table.into(),
            requested: requested.into(),
            largest: largest.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input (as opposed to table limits)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::UnknownConductorSize { .. }
                | CalcError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownConductorSize { .. } => "UNKNOWN_CONDUCTOR_SIZE",
            CalcError::TableExhausted { .. } => "TABLE_EXHAUSTED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// Reject negative, NaN and infinite values for a named field.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite, non-negative number",
        ));
    }
    Ok(())
}

/// Reject zero, negative, NaN and infinite values for a named field.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite, positive number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("load_amps", "-5", "Load current cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_conductor_size("13 AWG").error_code(), "UNKNOWN_CONDUCTOR_SIZE");
        assert_eq!(
            CalcError::table_exhausted("NEC 310.16", "900 A", "2000 kcmil").error_code(),
            "TABLE_EXHAUSTED"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(CalcError::invalid_input("x", "1", "bad").is_input_error());
        assert!(!CalcError::table_exhausted("t", "1", "2").is_input_error());
    }

    #[test]
    fn test_value_guards() {
        assert!(require_non_negative("load_amps", 0.0).is_ok());
        assert!(require_non_negative("load_amps", -1.0).is_err());
        assert!(require_non_negative("load_amps", f64::NAN).is_err());
        assert!(require_positive("voltage", 0.0).is_err());
        assert!(require_positive("voltage", 240.0).is_ok());
    }
}
