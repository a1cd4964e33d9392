//! Size bucketing and duplicate set types.
//!
//! # Overview
//!
//! This module provides the first, cheap stage of duplicate detection —
//! grouping files by exact size — and the [`DuplicateSet`] type that the
//! hashing stage resolves confirmed duplicates into.
//!
//! ## Size bucketing
//!
//! Files with different sizes cannot have identical content, so a size
//! with a single member is discarded before any file is read. On typical
//! trees this eliminates the large majority of files without I/O.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileRecord;
//! use dupescan::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! // Only sizes shared by 2+ files survive
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);  // The two 1024-byte files
//! assert_eq!(buckets.len(), 1);
//! ```

use std::collections::HashMap;

use crate::scanner::{Digest, FileRecord};

/// A confirmed set of duplicate files.
///
/// All members share one exact size and one content digest. Members are
/// kept sorted lexicographically by path, so the first member — the
/// "kept" representative — is always the smallest path and a rescan of
/// an unchanged tree reproduces the set byte for byte.
#[derive(Debug, Clone)]
pub struct DuplicateSet {
    /// Content digest shared by every member
    pub digest: Digest,
    /// File size in bytes shared by every member
    pub size: u64,
    /// Member files, sorted by path
    pub files: Vec<FileRecord>,
}

impl DuplicateSet {
    /// Create a new duplicate set, sorting members by path.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if a member's size or digest disagrees
    /// with the set.
    #[must_use]
    pub fn new(digest: Digest, size: u64, mut files: Vec<FileRecord>) -> Self {
        debug_assert!(
            files
                .iter()
                .all(|f| f.size == size && f.digest == Some(digest)),
            "Duplicate set members must share size and digest"
        );
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            digest,
            size,
            files,
        }
    }

    /// Number of files in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The kept representative: the lexicographically smallest path.
    #[must_use]
    pub fn kept(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// All members except the kept representative.
    #[must_use]
    pub fn redundant(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or(&[])
    }

    /// Number of redundant copies (total members minus the kept one).
    #[must_use]
    pub fn redundant_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes recoverable by removing every redundant copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.redundant_count() as u64
    }
}

/// Statistics from the size bucketing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes seen
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size bucketing.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by exact size, discarding sizes with a single member.
///
/// This is the first stage of duplicate detection. Files with different
/// sizes cannot be duplicates, so only the sizes shared by at least two
/// files move on to hashing. Size 0 is a bucket like any other: empty
/// files are byte-identical to each other and report as duplicates.
///
/// # Arguments
///
/// * `files` - Iterator of file records to bucket
///
/// # Returns
///
/// A tuple of:
/// - `HashMap<u64, Vec<FileRecord>>` - Buckets with 2+ members, keyed by size
/// - `GroupingStats` - Statistics about the bucketing operation
///
/// # Performance
///
/// O(n) time and space in the number of files; no file I/O is performed.
///
/// # Example
///
/// ```
/// use dupescan::scanner::FileRecord;
/// use dupescan::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (buckets, stats) = group_by_size(files);
///
/// // Only the 100-byte bucket survives
/// assert_eq!(buckets.len(), 1);
/// assert!(buckets.contains_key(&100));
/// assert_eq!(buckets[&100].len(), 2);
///
/// assert_eq!(stats.total_files, 3);
/// assert_eq!(stats.eliminated_unique, 1);  // The 200-byte file
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileRecord>,
) -> (HashMap<u64, Vec<FileRecord>>, GroupingStats) {
    let mut all_buckets: HashMap<u64, Vec<FileRecord>> = HashMap::new();
    let mut stats = GroupingStats::default();

    // First pass: bucket every file by exact size
    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        all_buckets.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_buckets.len();

    // Second pass: a size with a single member can have no duplicate
    let buckets: HashMap<u64, Vec<FileRecord>> = all_buckets
        .into_iter()
        .filter(|(size, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!(
                    "Eliminated unique size {}: {}",
                    size,
                    files[0].path.display()
                );
                false
            } else {
                stats.potential_duplicates += files.len();
                stats.duplicate_buckets += 1;
                log::debug!("Size bucket {} bytes: {} hash candidates", size, files.len());
                true
            }
        })
        .collect();

    log::info!(
        "Size grouping complete: {} files → {} hash candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (buckets, stats)
}
