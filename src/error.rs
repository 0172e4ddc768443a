//! Error types and exit codes for codesentry

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for codesentry setup and channel failures.
///
/// Per-call analysis failures are not errors at this level; they travel as
/// [`crate::analysis::AnalysisFailure`] values inside a successful call.
#[derive(Error, Debug)]
pub enum CodeSentryError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to read {path}: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Relay unavailable at {url}: {message}")]
    RelayUnavailable { url: String, message: String },

    #[error("Relay protocol error: {message}")]
    Protocol { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Analysis failed: {0}")]
    Analysis(#[from] crate::analysis::AnalysisFailure),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodeSentryError {
    /// Convert error to a process exit code:
    /// - 0: Success
    /// - 1: IO error
    /// - 2: Configuration error
    /// - 3: Invalid request
    /// - 4: Relay unavailable / protocol failure
    /// - 5: Analysis produced no text
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::IoError { .. } | Self::Io(_) => ExitCode::from(1),
            Self::ConfigError { .. } => ExitCode::from(2),
            Self::InvalidRequest { .. } | Self::Json(_) => ExitCode::from(3),
            Self::RelayUnavailable { .. } | Self::Protocol { .. } => ExitCode::from(4),
            Self::Analysis(_) => ExitCode::from(5),
        }
    }
}

/// Result type alias for codesentry operations
pub type Result<T> = std::result::Result<T, CodeSentryError>;
