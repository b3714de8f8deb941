//! Custom error types for BenchImage.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`
//! in the library - every failure a task can end with is a named variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::SizeLabel;

/// Top-level error type for the filter engine and task orchestration.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Codec / Asset Errors - end the task as Failed, no partial result
    // =========================================================================
    #[error("Decode error: {reason}")]
    Decode { reason: String },

    #[error("Encode error: {reason}")]
    Encode { reason: String },

    #[error("Asset not found: {image_id} at {size}")]
    NotFound { image_id: String, size: SizeLabel },

    // =========================================================================
    // Algorithm Errors - programming errors, abort the current task only
    // =========================================================================
    #[error("Invalid dimensions: {reason}")]
    InvalidDimensions { reason: String },

    #[error("Pixel ({x}, {y}) out of bounds for {width}x{height} buffer")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    // =========================================================================
    // Strategy / Task Errors
    // =========================================================================
    #[error("No filter strategy registered for key '{key}'")]
    StrategyUnavailable { key: String },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(#[from] StateTransitionError),

    #[error("Task was cancelled")]
    Cancelled,

    #[error("Background worker failed: {reason}")]
    Worker { reason: String },

    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl BenchError {
    /// Shorthand for the dimension failures raised by the algorithms.
    pub fn invalid_dimensions(reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for BenchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker {
            reason: err.to_string(),
        }
    }
}

/// Validation errors for configuration values.
/// Raised when a request cannot be built from its raw form.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },
}

/// State transition errors for the filter task state machine.
#[derive(Debug, Error)]
pub enum StateTransitionError {
    #[error("Cannot transition from {from} to {to} for task {task_id}")]
    InvalidTransition {
        task_id: String,
        from: &'static str,
        to: &'static str,
    },
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = BenchError::NotFound {
            image_id: "img5.jpg".to_string(),
            size: SizeLabel::Mp8,
        };
        assert!(err.to_string().contains("img5.jpg"));
        assert!(err.to_string().contains("8MP"));
    }

    #[test]
    fn test_error_chain() {
        let validation_err = ValidationError::InvalidEndpoint {
            value: "host:0".to_string(),
            reason: "port must be non-zero".to_string(),
        };
        let err: BenchError = validation_err.into();
        assert!(matches!(err, BenchError::Validation(_)));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = BenchError::IndexOutOfBounds {
            x: 4,
            y: 1,
            width: 4,
            height: 4,
        };
        assert_eq!(err.to_string(), "Pixel (4, 1) out of bounds for 4x4 buffer");
    }
}
