//! Error types for valuator operations.
//!
//! The numeric core never lets `NaN`/`Infinity` leak out of malformed input:
//! every public entry point validates shape and hyperparameters first and
//! reports the problem through [`ValuatorError`].

use thiserror::Error;

/// Result type alias for valuator operations.
pub type Result<T> = std::result::Result<T, ValuatorError>;

/// Main error type for valuator operations.
///
/// # Examples
///
/// ```
/// use valuator::error::ValuatorError;
///
/// let err = ValuatorError::DimensionMismatch {
///     expected: "5 columns".to_string(),
///     actual: "4 columns".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum ValuatorError {
    /// A matrix, vector or dataset had no rows.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A classification label outside {0, 1}.
    #[error("invalid label {label} at row {row}: labels must be 0 or 1")]
    InvalidLabel {
        /// Row index of the offending label
        row: usize,
        /// The label found
        label: usize,
    },

    /// `predict` (or an accessor) was called before `fit`.
    #[error("{model} is not fitted; call fit() first")]
    NotFitted {
        /// Model name
        model: &'static str,
    },

    /// Input contained `NaN` or an infinite value.
    #[error("non-finite value in {context}")]
    NonFinite {
        /// Where the value was found
        context: String,
    },

    /// Invalid analysis configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValuatorError {
    /// Creates an [`ValuatorError::EmptyInput`] error.
    #[must_use]
    pub fn empty(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    /// Creates an [`ValuatorError::InvalidHyperparameter`] error.
    #[must_use]
    pub fn hyperparameter(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidHyperparameter {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Creates a column-count [`ValuatorError::DimensionMismatch`] error.
    #[must_use]
    pub fn columns(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{expected} columns"),
            actual: format!("{actual} columns"),
        }
    }

    /// Creates a row-count [`ValuatorError::DimensionMismatch`] error.
    #[must_use]
    pub fn rows(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{expected} samples"),
            actual: format!("{actual} samples"),
        }
    }
}
