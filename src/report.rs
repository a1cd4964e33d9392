//! Human-readable reporting and the export artifact.
//!
//! The text report lists every duplicate set with its kept
//! representative first, followed by a summary block. The export
//! artifact is a plain newline-delimited list of the redundant paths,
//! written to `duplicates-YYYYMMDD-HHMMSS.txt` for consumption by
//! external tooling (`xargs rm`, review scripts, and the like).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use chrono::Local;

use crate::duplicates::{DuplicateSet, ScanSummary};

/// Text report formatter.
///
/// # Example
///
/// ```no_run
/// use dupescan::duplicates::DuplicateFinder;
/// use dupescan::report::TextReport;
/// use std::path::PathBuf;
///
/// let finder = DuplicateFinder::with_defaults();
/// let (sets, summary) = finder.find_duplicates(&[PathBuf::from(".")]);
///
/// let report = TextReport::new(&sets, &summary);
/// print!("{}", report.render());
/// ```
pub struct TextReport<'a> {
    sets: &'a [DuplicateSet],
    summary: &'a ScanSummary,
    roots: &'a [PathBuf],
    extensions: &'a [String],
}

impl<'a> TextReport<'a> {
    /// Create a new text report over scan results.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet], summary: &'a ScanSummary) -> Self {
        Self {
            sets,
            summary,
            roots: &[],
            extensions: &[],
        }
    }

    /// Include the scanned roots and extension filter in the report.
    #[must_use]
    pub fn with_scope(mut self, roots: &'a [PathBuf], extensions: &'a [String]) -> Self {
        self.roots = roots;
        self.extensions = extensions;
        self
    }

    /// Write the report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.summary.interrupted {
            writeln!(writer, "Scan interrupted: results are partial.")?;
            writeln!(writer)?;
        }

        if self.sets.is_empty() {
            writeln!(writer, "No duplicate files found.")?;
        } else {
            for (idx, set) in self.sets.iter().enumerate() {
                writeln!(
                    writer,
                    "Set {}: {} files x {}  digest {}",
                    idx + 1,
                    set.len(),
                    human_size(set.size),
                    short_digest(&set.digest.to_hex())
                )?;
                if let Some(kept) = set.kept() {
                    writeln!(writer, "    kept       {}", kept.path.display())?;
                }
                for file in set.redundant() {
                    writeln!(writer, "    redundant  {}", file.path.display())?;
                }
                writeln!(writer)?;
            }
        }

        if !self.roots.is_empty() {
            let roots: Vec<String> = self.roots.iter().map(|r| r.display().to_string()).collect();
            if self.extensions.is_empty() {
                writeln!(writer, "Roots: {}", roots.join(", "))?;
            } else {
                writeln!(
                    writer,
                    "Roots: {}  (filter: .{})",
                    roots.join(", "),
                    self.extensions.join(", .")
                )?;
            }
        }
        writeln!(
            writer,
            "Scanned {} files ({}) in {:.2?}",
            self.summary.files_counted,
            human_size(self.summary.bytes_counted),
            self.summary.scan_duration
        )?;
        writeln!(
            writer,
            "Size bucketing eliminated {} files; {} hashed",
            self.summary.eliminated_by_size, self.summary.files_hashed
        )?;
        writeln!(
            writer,
            "{} duplicate sets: {} redundant files, {} reclaimable ({:.1}% of scanned bytes)",
            self.summary.duplicate_sets,
            self.summary.duplicate_files,
            human_size(self.summary.duplicate_bytes),
            self.summary.wasted_percentage()
        )?;

        if !self.summary.warnings.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Warnings ({}):", self.summary.warnings.len())?;
            for warning in &self.summary.warnings {
                writeln!(writer, "  {warning}")?;
            }
        }

        Ok(())
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Write the redundant file list to a timestamped artifact in `dir`.
///
/// Each line is one absolute path to a redundant file (the scan
/// canonicalizes its roots, so set members are already absolute); kept
/// representatives never appear. With no redundant files there is
/// nothing worth writing and no artifact is created.
///
/// Returns the path of the written artifact, or `None` when it was
/// skipped.
///
/// # Errors
///
/// Returns an error if the artifact cannot be created or written.
pub fn export_redundant_list(sets: &[DuplicateSet], dir: &Path) -> io::Result<Option<PathBuf>> {
    if sets.iter().all(|s| s.redundant().is_empty()) {
        log::debug!("Export: no redundant files, skipping artifact");
        return Ok(None);
    }

    let file_name = format!("duplicates-{}.txt", Local::now().format("%Y%m%d-%H%M%S"));
    let path = dir.join(file_name);

    let mut out = io::BufWriter::new(std::fs::File::create(&path)?);
    for set in sets {
        for file in set.redundant() {
            writeln!(out, "{}", file.path.display())?;
        }
    }
    out.flush()?;

    log::info!("Exported redundant file list to {}", path.display());
    Ok(Some(path))
}

/// Format a byte count with IEC units.
fn human_size(bytes: u64) -> String {
    ByteSize::b(bytes).display().iec().to_string()
}

/// First 16 hex characters of a digest, enough to tell sets apart.
fn short_digest(hex: &str) -> &str {
    &hex[..hex.len().min(16)]
}
