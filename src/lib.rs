//! dupescan - Duplicate File Finder
//!
//! A CLI tool and library for finding files with identical content.
//! Files are bucketed by exact size first, so only files whose size is
//! shared are ever hashed; the remaining candidates are digested in
//! parallel and grouped into duplicate sets with one kept
//! representative each.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod signal;

use cli::{Cli, OutputFormat};
use duplicates::{DuplicateFinder, ScanConfig};
use error::{ConfigError, ExitCode};
use output::{CsvOutput, JsonOutput};
use progress::Progress;
use report::TextReport;
use scanner::WalkerConfig;

/// Run the application with parsed CLI arguments.
///
/// Validates the invocation, installs the Ctrl+C handler, runs the
/// scan, and renders the report in the requested format on stdout.
/// The export artifact, when requested, is written only for complete
/// scans; per-item failures during the scan itself never surface here.
///
/// # Errors
///
/// Returns an error for an unusable invocation (see [`ConfigError`])
/// or when the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    // Validate the export destination before any scanning happens
    let export_dir = if cli.export_requested() {
        let dir = cli
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if !dir.exists() {
            return Err(ConfigError::ExportDirMissing(dir).into());
        }
        if !dir.is_dir() {
            return Err(ConfigError::ExportDirNotADirectory(dir).into());
        }
        Some(dir)
    } else {
        None
    };

    let handler = signal::install_handler();
    let progress = Arc::new(Progress::new(cli.quiet));

    let extensions = cli.normalized_extensions();
    let walker = WalkerConfig::new(extensions.clone(), cli.follow_symlinks);
    let mut config = ScanConfig::default()
        .with_walker(walker)
        .with_digest(cli.digest.kind())
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }

    let roots = cli.effective_roots();
    let finder = DuplicateFinder::new(config);
    let (sets, summary) = finder.find_duplicates(&roots);

    let exit_code = if summary.interrupted {
        ExitCode::Interrupted
    } else {
        ExitCode::Success
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            TextReport::new(&sets, &summary)
                .with_scope(&roots, &extensions)
                .write_to(&mut out)
                .context("Failed to write text report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&sets, &summary, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&sets)
                .write_to(&mut out)
                .context("Failed to write CSV report")?;
        }
    }

    if let Some(dir) = export_dir {
        if summary.interrupted {
            // A partial list must never masquerade as a complete one
            log::warn!("Scan interrupted, export artifact not written");
        } else if let Err(e) = report::export_redundant_list(&sets, &dir) {
            log::warn!("Failed to write export artifact: {e}");
        }
    }

    Ok(exit_code)
}
