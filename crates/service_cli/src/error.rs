//! CLI error types.

use pricer_xva::ExposureError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Exposure(#[from] ExposureError),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
