//! # Error Types
//!
//! Structured error types for calcora_core. A calculation never panics and
//! never returns one of these to the UI directly: [`crate::calculations`]
//! maps them onto an invalid result bundle. They surface through
//! `try_calculate`, the registry, and config validation.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::errors::{CalcError, CalcResult};
//!
//! fn validate_weight(weight_kg: f64) -> CalcResult<()> {
//!     if weight_kg <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "weight",
//!             weight_kg.to_string(),
//!             "Weight must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_weight(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calcora_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A required input is null, absent, or an empty string
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An input value violates its type, bounds, or a domain rule
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No calculator registered under this id
    #[error("Calculator not found: {id}")]
    CalculatorNotFound { id: String },

    /// The calculator has no preset with this id
    #[error("Preset '{preset}' not found for calculator '{calculator}'")]
    PresetNotFound { calculator: String, preset: String },

    /// No text bundle for this calculator in any language of the fallback chain
    #[error("No locale bundle for '{calculator}' ({language})")]
    LocaleNotFound { calculator: String, language: String },

    /// A `{token}` template could not be rendered
    #[error("Template error: {reason}")]
    TemplateError { reason: String },

    /// An authored configuration breaks one of its invariants
    #[error("Invalid configuration for '{calculator}': {reason}")]
    ConfigInvalid { calculator: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// An external collaborator (tracking, history) rejected a call
    #[error("Collaborator '{collaborator}' failed: {reason}")]
    CollaboratorFailed { collaborator: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn calculator_not_found(id: impl Into<String>) -> Self {
        CalcError::CalculatorNotFound { id: id.into() }
    }

    pub fn preset_not_found(calculator: impl Into<String>, preset: impl Into<String>) -> Self {
        CalcError::PresetNotFound {
            calculator: calculator.into(),
            preset: preset.into(),
        }
    }

    pub fn template(reason: impl Into<String>) -> Self {
        CalcError::TemplateError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(calculator: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigInvalid {
            calculator: calculator.into(),
            reason: reason.into(),
        }
    }

    pub fn collaborator_failed(collaborator: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CollaboratorFailed {
            collaborator: collaborator.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// True for the two kinds that mean "the user's input cannot be
    /// evaluated yet" and map onto an invalid result bundle.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CalcError::MissingField { .. } | CalcError::InvalidInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::CalculatorNotFound { .. } => "CALCULATOR_NOT_FOUND",
            CalcError::PresetNotFound { .. } => "PRESET_NOT_FOUND",
            CalcError::LocaleNotFound { .. } => "LOCALE_NOT_FOUND",
            CalcError::TemplateError { .. } => "TEMPLATE_ERROR",
            CalcError::ConfigInvalid { .. } => "CONFIG_INVALID",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::CollaboratorFailed { .. } => "COLLABORATOR_FAILED",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("weight", "-5", "Weight must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("age").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::calculator_not_found("x").error_code(), "CALCULATOR_NOT_FOUND");
        assert_eq!(CalcError::template("unclosed").error_code(), "TEMPLATE_ERROR");
    }

    #[test]
    fn test_input_error_classification() {
        assert!(CalcError::missing_field("age").is_input_error());
        assert!(CalcError::invalid_input("age", "-1", "negative").is_input_error());
        assert!(!CalcError::preset_not_found("bmr", "x").is_input_error());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::preset_not_found("discount", "black-friday");
        assert_eq!(
            error.to_string(),
            "Preset 'black-friday' not found for calculator 'discount'"
        );
    }
}
