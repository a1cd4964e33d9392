//! Command-line interface definitions.
//!
//! All arguments are defined with the clap derive API. The interface is
//! a single flat command: roots to scan are positional, everything else
//! is a flag.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! dupescan
//!
//! # Scan two trees, jpg files only, and export the redundant list
//! dupescan ~/Pictures /mnt/backup -e jpg -x
//!
//! # JSON report for scripting
//! dupescan ~/Downloads -o json
//!
//! # Verbose mode for debugging
//! dupescan -v ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::DigestKind;

/// Duplicate file finder.
///
/// Finds files with identical content by bucketing on size, then
/// hashing only the files whose size is shared. Reports duplicate sets
/// with one kept representative each, and can export the redundant
/// paths for external tooling.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (defaults to the current directory)
    #[arg(value_name = "ROOTS")]
    pub roots: Vec<PathBuf>,

    /// Only consider files with this extension (repeatable)
    ///
    /// Matching is case-sensitive and requires the dot separator:
    /// `-e jpg` matches `photo.jpg` but not `photojpg` or `photo.JPG`.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Export the redundant file list to a timestamped text artifact
    #[arg(short = 'x', long)]
    pub export: bool,

    /// Directory for the export artifact (default: current directory)
    ///
    /// Must already exist. Implies --export.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Digest algorithm for content comparison
    #[arg(long, value_enum, default_value_t = DigestAlgo::Sha256)]
    pub digest: DigestAlgo,

    /// Number of hashing threads (default: available parallelism)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(short = 'j', long, value_name = "N", value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Output format for the duplicate report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Follow symbolic links during the scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Report fatal errors as a JSON object on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report itself
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Roots to scan: the ones given, or the current directory when
    /// none were.
    #[must_use]
    pub fn effective_roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.roots.clone()
        }
    }

    /// Extension filter with leading dots trimmed, so `-e .jpg` and
    /// `-e jpg` are equivalent.
    #[must_use]
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect()
    }

    /// Whether an export artifact was requested.
    #[must_use]
    pub fn export_requested(&self) -> bool {
        self.export || self.export_dir.is_some()
    }
}

/// Digest algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigestAlgo {
    /// SHA-256 (default)
    Sha256,
    /// BLAKE3, fastest on large trees
    Blake3,
    /// MD5, for interoperability with existing file lists
    Md5,
}

impl DigestAlgo {
    /// The scanner-level digest kind this selection maps to.
    #[must_use]
    pub fn kind(self) -> DigestKind {
        match self {
            DigestAlgo::Sha256 => DigestKind::Sha256,
            DigestAlgo::Blake3 => DigestKind::Blake3,
            DigestAlgo::Md5 => DigestKind::Md5,
        }
    }
}

impl std::fmt::Display for DigestAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgo::Sha256 => write!(f, "sha256"),
            DigestAlgo::Blake3 => write!(f, "blake3"),
            DigestAlgo::Md5 => write!(f, "md5"),
        }
    }
}

/// Output format for the duplicate report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a thread count, rejecting zero.
///
/// # Errors
///
/// Returns an error if the string is not a number or is zero.
pub fn parse_threads(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid thread count: '{s}'"))?;
    if n == 0 {
        return Err("Thread count must be at least 1".to_string());
    }
    Ok(n)
}
