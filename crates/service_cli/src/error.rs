//! CLI error type.

use sampler_core::{ConfigError, SamplerError, StatsError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sampling or cache failure.
    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),

    /// Moment computation failure.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Invalid command line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Cached distributions failed re-validation.
    #[error("{0} cached distribution(s) failed re-validation")]
    CheckFailed(usize),

    /// JSON output failure.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
