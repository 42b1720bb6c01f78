//! # Error Types
//!
//! Structured error types for draw_core. Errors serialize to JSON so the
//! line protocol can hand them back to the caller as data, with enough
//! context to fix the offending request field.
//!
//! ## Example
//!
//! ```rust
//! use draw_core::errors::{DrawError, DrawResult};
//!
//! fn validate_dies(dies: u32) -> DrawResult<()> {
//!     if dies == 0 {
//!         return Err(DrawError::invalid_input(
//!             "dies",
//!             dies.to_string(),
//!             "At least one die is required",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for draw_core operations
pub type DrawResult<T> = Result<T, DrawError>;

/// Structured error type for schedule calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DrawError {
    /// An input value is invalid (out of range, zero diameter, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material name or index not in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// The numeric procedure could not produce a schedule
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// The request record could not be decoded
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl DrawError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DrawError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        DrawError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        DrawError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        DrawError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a ParseError
    pub fn parse(reason: impl Into<String>) -> Self {
        DrawError::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        DrawError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the request content rather than the environment.
    ///
    /// These abort a single request; the serving loop keeps going.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            DrawError::InvalidInput { .. }
                | DrawError::MissingField { .. }
                | DrawError::MaterialNotFound { .. }
                | DrawError::ParseError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DrawError::InvalidInput { .. } => "INVALID_INPUT",
            DrawError::MissingField { .. } => "MISSING_FIELD",
            DrawError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            DrawError::CalculationFailed { .. } => "CALCULATION_FAILED",
            DrawError::ParseError { .. } => "PARSE_ERROR",
            DrawError::FileError { .. } => "FILE_ERROR",
            DrawError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for DrawError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            DrawError::ParseError {
                reason: e.to_string(),
            }
        } else {
            DrawError::SerializationError {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DrawError::invalid_input("initialDiameter", "0", "Diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: DrawError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DrawError::missing_field("dies").error_code(), "MISSING_FIELD");
        assert_eq!(DrawError::material_not_found("Bronze").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(DrawError::parse("eof").error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_json_errors_map_to_parse_error() {
        let err: DrawError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.is_request_error());
    }

    #[test]
    fn test_calculation_failure_is_not_request_error() {
        let err = DrawError::calculation_failed("Optimized", "zero force");
        assert!(!err.is_request_error());
    }
}
