//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicate_sets": [
//!     {
//!       "size": 1024,
//!       "digest": "abc123...",
//!       "kept": "/path/to/file1.txt",
//!       "redundant": ["/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "files_counted": 100,
//!     "bytes_counted": 1048576,
//!     "eliminated_by_size": 80,
//!     "files_hashed": 20,
//!     "duplicate_sets": 5,
//!     "duplicate_files": 10,
//!     "duplicate_bytes": 51200,
//!     "scan_duration_ms": 1234,
//!     "interrupted": false,
//!     "warnings": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateSet, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateSet {
    /// File size in bytes (every member has this size)
    pub size: u64,
    /// Content digest as hexadecimal string
    pub digest: String,
    /// Absolute path of the kept representative
    pub kept: String,
    /// Absolute paths of the redundant members
    pub redundant: Vec<String>,
}

impl JsonDuplicateSet {
    /// Create a JSON duplicate set from a [`DuplicateSet`].
    ///
    /// Member paths are emitted as-is; the scan canonicalizes its
    /// roots, so paths coming out of a scan are absolute.
    #[must_use]
    pub fn from_duplicate_set(set: &DuplicateSet) -> Self {
        Self {
            size: set.size,
            digest: set.digest.to_hex(),
            kept: set
                .kept()
                .map(|f| f.path.to_string_lossy().into_owned())
                .unwrap_or_default(),
            redundant: set
                .redundant()
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files enumerated
    pub files_counted: usize,
    /// Total size of enumerated files in bytes
    pub bytes_counted: u64,
    /// Files eliminated before hashing because their size was unique
    pub eliminated_by_size: usize,
    /// Files whose content hashing was attempted
    pub files_hashed: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_sets: usize,
    /// Total number of redundant files (excluding kept representatives)
    pub duplicate_files: usize,
    /// Space that can be reclaimed by removing redundant files (bytes)
    pub duplicate_bytes: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// Number of per-item warnings emitted during the scan
    pub warnings: usize,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a [`ScanSummary`] and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            files_counted: summary.files_counted,
            bytes_counted: summary.bytes_counted,
            eliminated_by_size: summary.eliminated_by_size,
            files_hashed: summary.files_hashed,
            duplicate_sets: summary.duplicate_sets,
            duplicate_files: summary.duplicate_files,
            duplicate_bytes: summary.duplicate_bytes,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            interrupted: summary.interrupted,
            warnings: summary.warnings.len(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate sets
    pub duplicate_sets: Vec<JsonDuplicateSet>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate sets, summary and exit code.
    #[must_use]
    pub fn new(sets: &[DuplicateSet], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicate_sets: sets.iter().map(JsonDuplicateSet::from_duplicate_set).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
