//! Structured error handling and exit codes.

use std::path::PathBuf;

use serde::Serialize;

/// Process exit codes.
///
/// - 0: Success (scan completed, with or without duplicates)
/// - 1: General error (unexpected runtime failure)
/// - 2: Configuration error (invalid flags or export destination)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: scan completed normally. Finding zero duplicates is
    /// still success.
    Success = 0,
    /// General error: an unexpected error occurred during the scan.
    GeneralError = 1,
    /// Configuration error: the invocation itself was unusable.
    ConfigError = 2,
    /// Interrupted: scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::ConfigError => "DS002",
            Self::Interrupted => "DS130",
        }
    }
}

/// Errors that make an invocation unusable before any scanning starts.
///
/// These map to [`ExitCode::ConfigError`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested export directory does not exist.
    #[error("Export directory does not exist: {0}")]
    ExportDirMissing(PathBuf),

    /// The requested export directory is not a directory.
    #[error("Export destination is not a directory: {0}")]
    ExportDirNotADirectory(PathBuf),
}

/// Structured error information for JSON error output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
