//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: enumerate regular files under every valid root
//! 2. **Size bucketing**: group files by exact size (see
//!    [`crate::duplicates::groups`]); sizes with one member are dropped
//! 3. **Hashing**: digest the remaining candidates in parallel
//! 4. **Resolution**: files sharing (size, digest) form a [`DuplicateSet`]
//!
//! Per-file failures anywhere in the pipeline are warnings, never fatal:
//! the affected file drops out and the scan continues.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ScanConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(ScanConfig::default());
//! let (sets, summary) = finder.find_duplicates(&[PathBuf::from(".")]);
//!
//! println!("Found {} duplicate sets", summary.duplicate_sets);
//! println!("Reclaimable: {} bytes", summary.duplicate_bytes);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{
    Digest, DigestKind, FileHasher, FileRecord, HashError, ScanError, Walker, WalkerConfig,
};

use super::groups::{group_by_size, DuplicateSet};

/// Configuration for a duplicate scan.
#[derive(Clone)]
pub struct ScanConfig {
    /// Walker configuration (extension filter, symlink handling).
    pub walker: WalkerConfig,
    /// Digest algorithm for content comparison.
    pub digest: DigestKind,
    /// Number of threads in the hashing pool.
    /// Defaults to the available parallelism of the host.
    pub threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanConfig")
            .field("walker", &self.walker)
            .field("digest", &self.digest)
            .field("threads", &self.threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            walker: WalkerConfig::default(),
            digest: DigestKind::default(),
            threads: default_thread_count(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl ScanConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_digest(mut self, digest: DigestKind) -> Self {
        self.digest = digest;
        self
    }

    /// Set the hashing pool width. Clamped to at least one thread.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Number of hashing threads when none is configured.
fn default_thread_count() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

/// Statistics from the hashing stage.
#[derive(Debug, Default)]
struct HashingStats {
    /// Total candidate files that entered the stage
    input_files: usize,
    /// Number of files successfully hashed
    hashed_files: usize,
    /// Number of files that failed to hash (vanished, changed, unreadable)
    failed_files: usize,
    /// Errors behind the failures
    errors: Vec<HashError>,
    /// Number of digest groups collapsed to a single member
    unique_digests: usize,
    /// Number of files confirmed as duplicate set members
    duplicate_files: usize,
    /// Whether the stage was cut short by shutdown
    interrupted: bool,
}

impl HashingStats {
    /// Percentage of candidates eliminated by content comparison.
    fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            let eliminated = self.input_files - self.duplicate_files;
            (eliminated as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Hash every file in the retained size buckets and group by (size, digest).
///
/// Work items are the flattened bucket members; each is hashed
/// independently on the pool, with the shutdown flag checked before
/// every file. Grouping itself is sequential and cheap.
fn hash_buckets(
    buckets: HashMap<u64, Vec<FileRecord>>,
    hasher: &FileHasher,
    config: &ScanConfig,
) -> (HashMap<(u64, Digest), Vec<FileRecord>>, HashingStats) {
    let input_files: usize = buckets.values().map(Vec::len).sum();
    let mut stats = HashingStats {
        input_files,
        ..Default::default()
    };

    // Flatten all candidates from the size buckets
    let all_files: Vec<FileRecord> = buckets.into_values().flatten().collect();

    if all_files.is_empty() {
        log::debug!("Hashing: no candidates to process");
        return (HashMap::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", all_files.len());
    }

    log::info!(
        "Hashing {} candidate files with {}",
        all_files.len(),
        hasher.kind()
    );

    // Build a thread pool with bounded parallelism for I/O
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create custom thread pool, using global pool with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    let completed = AtomicUsize::new(0);
    let hash_results: Vec<(FileRecord, Result<Digest, HashError>)> = pool.install(|| {
        all_files
            .into_par_iter()
            .map(|file| {
                // Cancellation is per file: already-computed digests stay valid
                if config.is_shutdown_requested() {
                    log::debug!("Hashing: shutdown requested, skipping remaining files");
                    return (file, Err(HashError::Interrupted));
                }

                let result = match hasher.hash_file(&file.path, file.size) {
                    Ok(digest) => {
                        log::trace!("Hashed {}", file.path.display());
                        Ok(digest)
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", file.path.display(), e);
                        Err(e)
                    }
                };

                if let Some(ref callback) = config.progress_callback {
                    // Completion count, not work-item index: workers
                    // finish out of order
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    callback.on_progress(done, file.path.to_string_lossy().as_ref());
                }

                (file, result)
            })
            .collect()
    });

    if config.is_shutdown_requested() {
        stats.interrupted = true;
        log::info!("Hashing: interrupted by shutdown signal");
    }

    // Group by (size, digest); a digest match across different sizes is
    // not a duplicate
    let mut digest_groups: HashMap<(u64, Digest), Vec<FileRecord>> = HashMap::new();

    for (mut file, result) in hash_results {
        match result {
            Ok(digest) => {
                stats.hashed_files += 1;
                file.digest = Some(digest);
                digest_groups
                    .entry((file.size, digest))
                    .or_default()
                    .push(file);
            }
            Err(HashError::Interrupted) => {}
            Err(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    // A digest seen once within its size bucket is not a duplicate
    let confirmed: HashMap<(u64, Digest), Vec<FileRecord>> = digest_groups
        .into_iter()
        .filter(|((size, digest), files)| {
            if files.len() == 1 {
                stats.unique_digests += 1;
                log::trace!(
                    "Eliminated unique digest {}: {}",
                    digest.to_hex(),
                    files[0].path.display()
                );
                false
            } else {
                stats.duplicate_files += files.len();
                log::debug!(
                    "Digest group {} ({} bytes): {} duplicates",
                    digest.to_hex(),
                    size,
                    files.len()
                );
                true
            }
        })
        .collect();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    log::info!(
        "Hashing complete: {} candidates → {} confirmed duplicates ({:.1}% eliminated)",
        stats.input_files,
        stats.duplicate_files,
        stats.elimination_rate()
    );

    (confirmed, stats)
}

/// Summary statistics from a duplicate scan.
///
/// Aggregate counts reflect only successfully processed items; files
/// dropped by a per-item failure appear in `warnings` instead.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of files enumerated with a successful metadata lookup
    pub files_counted: usize,
    /// Total size of counted files in bytes
    pub bytes_counted: u64,
    /// Files eliminated before hashing because their size was unique
    pub eliminated_by_size: usize,
    /// Files whose content hashing was attempted
    pub files_hashed: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_sets: usize,
    /// Redundant files (set members beyond each kept representative)
    pub duplicate_files: usize,
    /// Bytes recoverable by removing every redundant file
    pub duplicate_bytes: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// Per-item warnings: skipped roots, unreadable entries, hash failures
    pub warnings: Vec<String>,
}

impl ScanSummary {
    /// Percentage of scanned bytes held by redundant files.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.bytes_counted == 0 {
            0.0
        } else {
            (self.duplicate_bytes as f64 / self.bytes_counted as f64) * 100.0
        }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dupescan::duplicates::{DuplicateFinder, ScanConfig};
/// use std::path::PathBuf;
///
/// let config = ScanConfig::default().with_threads(4);
/// let finder = DuplicateFinder::new(config);
///
/// let (sets, summary) = finder.find_duplicates(&[PathBuf::from("/some/path")]);
///
/// println!("Found {} duplicate sets", sets.len());
/// println!("Reclaimable: {} bytes", summary.duplicate_bytes);
/// ```
pub struct DuplicateFinder {
    config: ScanConfig,
    hasher: Arc<FileHasher>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        let hasher = Arc::new(FileHasher::new(config.digest));
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScanConfig::default())
    }

    /// The hasher driving content comparison.
    ///
    /// Exposed so callers can observe how many hash invocations a scan
    /// actually performed.
    #[must_use]
    pub fn hasher(&self) -> &FileHasher {
        &self.hasher
    }

    /// Find all duplicate files under the given roots.
    ///
    /// Invalid roots (missing, not a directory) are recorded as
    /// warnings and skipped; the scan proceeds over whatever remains,
    /// and an empty enumeration simply produces a zero-count summary.
    /// Valid roots are canonicalized before walking, so every path in
    /// the results is absolute, and roots that repeat or nest inside
    /// one another contribute each file exactly once — a file is never
    /// reported as a duplicate of itself.
    /// Interruption is likewise not an error: the returned sets are
    /// whatever was confirmed before the shutdown flag was seen, with
    /// `summary.interrupted` set.
    ///
    /// Returned sets are ordered by size descending, then digest, and
    /// each set's members by path, so rescanning an unchanged tree
    /// yields identical output.
    #[must_use]
    pub fn find_duplicates(&self, roots: &[PathBuf]) -> (Vec<DuplicateSet>, ScanSummary) {
        let start_time = std::time::Instant::now();
        let mut summary = ScanSummary::default();

        if self.config.is_shutdown_requested() {
            log::info!("Shutdown requested before scan started");
            summary.interrupted = true;
            summary.scan_duration = start_time.elapsed();
            return (Vec::new(), summary);
        }

        log::info!("Starting duplicate scan of {} root(s)", roots.len());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        let mut files = Vec::new();
        let mut seen_paths: HashSet<PathBuf> = HashSet::new();
        let mut walked_roots: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            if self.config.is_shutdown_requested() {
                break;
            }

            let invalid = if !root.exists() {
                Some(ScanError::NotFound(root.clone()))
            } else if !root.is_dir() {
                Some(ScanError::NotADirectory(root.clone()))
            } else {
                None
            };
            if let Some(err) = invalid {
                log::warn!("Skipping root: {err}");
                summary.warnings.push(format!("Skipping root: {err}"));
                continue;
            }

            // Resolve the root so every yielded path is absolute and a
            // root spelled two ways is recognized as the same tree
            let root = match root.canonicalize() {
                Ok(canonical) => canonical,
                Err(e) => {
                    let err = ScanError::Io {
                        path: root.clone(),
                        source: e,
                    };
                    log::warn!("Skipping root: {err}");
                    summary.warnings.push(format!("Skipping root: {err}"));
                    continue;
                }
            };

            if !walked_roots.insert(root.clone()) {
                log::debug!("Root already walked: {}", root.display());
                continue;
            }

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_message(&format!("Walking {}", root.display()));
            }
            log::debug!("Walking {}", root.display());

            let mut walker = Walker::new(&root, self.config.walker.clone());
            if let Some(ref flag) = self.config.shutdown_flag {
                walker = walker.with_shutdown_flag(flag.clone());
            }

            for result in walker.walk() {
                match result {
                    Ok(file) => {
                        // A root nested inside an earlier one repeats
                        // its files; the same path must enter the
                        // pipeline once or it pairs with itself
                        if !seen_paths.insert(file.path.clone()) {
                            log::trace!("Already enumerated: {}", file.path.display());
                            continue;
                        }
                        if let Some(ref callback) = self.config.progress_callback {
                            callback
                                .on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                        }
                        files.push(file);
                    }
                    // Already logged where it arose; keep it for the summary
                    Err(e) => summary.warnings.push(format!("Skipping entry: {e}")),
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted during enumeration");
            summary.interrupted = true;
            summary.files_counted = files.len();
            summary.bytes_counted = files.iter().map(|f| f.size).sum();
            summary.scan_duration = start_time.elapsed();
            return (Vec::new(), summary);
        }

        let (buckets, group_stats) = group_by_size(files);
        summary.files_counted = group_stats.total_files;
        summary.bytes_counted = group_stats.total_size;
        summary.eliminated_by_size = group_stats.eliminated_unique;

        if buckets.is_empty() {
            log::info!("No size bucket holds more than one file; nothing to hash");
            summary.scan_duration = start_time.elapsed();
            return (Vec::new(), summary);
        }

        let (digest_groups, hash_stats) = hash_buckets(buckets, &self.hasher, &self.config);
        summary.files_hashed = hash_stats.hashed_files + hash_stats.failed_files;
        summary.interrupted = hash_stats.interrupted;
        for err in &hash_stats.errors {
            summary.warnings.push(format!("Skipping file: {err}"));
        }

        let mut sets: Vec<DuplicateSet> = digest_groups
            .into_iter()
            .map(|((size, digest), members)| DuplicateSet::new(digest, size, members))
            .collect();

        // Deterministic report order: largest sets first, digest as tie-break
        sets.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.digest.cmp(&b.digest)));

        summary.duplicate_sets = sets.len();
        summary.duplicate_files = sets.iter().map(DuplicateSet::redundant_count).sum();
        summary.duplicate_bytes = sets.iter().map(DuplicateSet::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} sets, {} redundant files, {} reclaimable bytes in {:.2?}",
            summary.duplicate_sets,
            summary.duplicate_files,
            summary.duplicate_bytes,
            summary.scan_duration
        );

        (sets, summary)
    }
}
