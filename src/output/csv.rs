//! CSV output formatter for duplicate scan results.
//!
//! Provides machine-readable CSV output for spreadsheets and data
//! analysis. One row is generated for each duplicate set member, kept
//! representative first.
//!
//! # Columns
//!
//! - `set_id`: Numeric ID identifying the duplicate set (1-based)
//! - `digest`: Content digest (hexadecimal)
//! - `size`: File size in bytes
//! - `role`: `kept` for the representative, `redundant` otherwise
//! - `path`: Path to the file
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::CsvOutput;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (sets, _) = finder.find_duplicates(&[PathBuf::from(".")]);
//!
//! let output = CsvOutput::new(&sets);
//! output.write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateSet;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Role of a file within its duplicate set.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    Kept,
    Redundant,
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    /// Unique identifier for the duplicate set
    set_id: usize,
    /// Content digest of the set (hex)
    digest: String,
    /// File size in bytes
    size: u64,
    /// Whether this file is the kept representative
    role: Role,
    /// Path to the file
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    sets: &'a [DuplicateSet],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet]) -> Self {
        Self { sets }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, set) in self.sets.iter().enumerate() {
            let set_id = idx + 1;
            let digest_hex = set.digest.to_hex();

            if let Some(kept) = set.kept() {
                csv_writer.serialize(CsvRow {
                    set_id,
                    digest: digest_hex.clone(),
                    size: set.size,
                    role: Role::Kept,
                    path: kept.path.to_string_lossy().to_string(),
                })?;
            }

            for file in set.redundant() {
                csv_writer.serialize(CsvRow {
                    set_id,
                    digest: digest_hex.clone(),
                    size: set.size,
                    role: Role::Redundant,
                    path: file.path.to_string_lossy().to_string(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
