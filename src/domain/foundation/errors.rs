//! Error types for the domain layer.

use thiserror::Error;

use crate::ports::{ContentError, QaError};

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or validating predefined content tables.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("Table '{table}' failed to parse: {reason}")]
    Parse { table: String, reason: String },

    #[error("Table '{table}' is empty after filtering")]
    Empty { table: String },

    #[error("State '{state}' declares next state '{next}' which has no entry")]
    DanglingNextState { state: String, next: String },

    #[error("State '{state}' has an empty answer pool")]
    EmptyAnswerPool { state: String },
}

/// Internal skill failure.
///
/// Anything of this kind is caught at the Turn Driver boundary and converted
/// into a decline result; it never propagates to the caller.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("content service failure: {0}")]
    Content(#[from] ContentError),

    #[error("question answering failure: {0}")]
    Qa(#[from] QaError),

    #[error("no transition rule declared for state '{state}'")]
    MissingTransition { state: String },

    #[error("table failure: {0}")]
    Table(#[from] TableError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
