//! CLI error types with exit code handling

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    #[diagnostic(code(homectl::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Resource template could not be loaded
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] homectl_engine::EngineError),

    /// Some services or resources failed; details were already printed
    #[error("{failed} of {total} operation(s) failed")]
    #[diagnostic(code(homectl::cli::failed))]
    OperationFailed { failed: usize, total: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Template(_) => exit_codes::TEMPLATE_ERROR,
            CliError::OperationFailed { .. } => exit_codes::OPERATION_FAILED,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an operation failure error
    pub fn operation_failed(failed: usize, total: usize) -> Self {
        Self::OperationFailed { failed, total }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
