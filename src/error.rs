//! Error types for Veriscore

use thiserror::Error;

/// Errors raised while scoring a login attempt.
///
/// Every variant is caller-triggered: the engine rejects structurally invalid
/// input and nothing else. Extreme-but-valid behavior (zero baselines, huge
/// deviations) is handled with floors and clamps, never errors.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} must be finite, got {value}")]
    NonFiniteField { field: &'static str, value: f64 },

    #[error("Field {field} must be non-negative, got {value}")]
    NegativeField { field: &'static str, value: f64 },

    #[error("Field {field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid engine configuration: {0}")]
    ConfigError(String),
}
