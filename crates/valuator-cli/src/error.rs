//! Error types for the valuator CLI.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use valuator::ValuatorError;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Error from the analysis library
    #[error(transparent)]
    Valuator(#[from] ValuatorError),
}

impl CliError {
    /// Numeric status reported to the shell
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::ConfigNotFound(_) => 3,
            Self::Valuator(ValuatorError::Config(_) | ValuatorError::Json(_)) => 4,
            Self::Valuator(ValuatorError::Io(_)) => 7,
            Self::Valuator(_) => 1,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::ConfigNotFound(PathBuf::from("x.json")).code(), 3);
        assert_eq!(CliError::from(ValuatorError::Config("bad".into())).code(), 4);
        assert_eq!(CliError::from(ValuatorError::empty("rows")).code(), 1);
    }

    #[test]
    fn test_messages() {
        let err = CliError::ConfigNotFound(PathBuf::from("missing.json"));
        assert_eq!(err.to_string(), "Config file not found: missing.json");
        let err = CliError::from(ValuatorError::Config("clustering.k must be at least 1".into()));
        assert!(err.to_string().contains("clustering.k"));
    }
}
