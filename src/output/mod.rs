//! Machine-readable output formatters for duplicate scan results.
//!
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! The human-readable text report and the export artifact live in
//! [`crate::report`].
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::error::ExitCode;
//! use dupescan::output::JsonOutput;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (sets, summary) = finder.find_duplicates(&[PathBuf::from(".")]);
//!
//! let output = JsonOutput::new(&sets, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;

// Re-export main types
pub use csv::CsvOutput;
pub use json::JsonOutput;
