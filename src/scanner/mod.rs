//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using jwalk
//! - Streaming content digests (SHA-256, BLAKE3, MD5)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming content digests
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! // Only consider .jpg files
//! let config = WalkerConfig {
//!     extensions: vec!["jpg".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Digest, DigestKind, FileHasher};
pub use walker::Walker;

/// Metadata for a discovered file.
///
/// Carries the path and the size observed at enumeration time; the
/// content digest is filled in later, and only for files that survive
/// size grouping.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes, captured at enumeration time
    pub size: u64,
    /// Content digest, populated by the hashing stage
    pub digest: Option<Digest>,
}

impl FileRecord {
    /// Create a new record for a discovered file.
    ///
    /// The digest starts out unset.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            digest: None,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Extensions to include, without the leading dot (e.g. `"jpg"`).
    /// Matching is case-sensitive; an empty list admits every file.
    pub extensions: Vec<String>,

    /// Follow symbolic links to directories during traversal.
    /// Symlinks themselves are never yielded as files.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    ///
    /// # Arguments
    ///
    /// * `extensions` - Bare extensions to include (empty = all files)
    /// * `follow_symlinks` - Whether to follow symbolic links
    #[must_use]
    pub fn new(extensions: Vec<String>, follow_symlinks: bool) -> Self {
        Self {
            extensions,
            follow_symlinks,
        }
    }

    /// Check whether a file name passes the extension filter.
    ///
    /// An empty filter admits everything. Otherwise the file name must
    /// end with `.` followed by one of the configured extensions,
    /// compared case-sensitively. Non-UTF-8 names never match a filter.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .and_then(|stem| stem.strip_suffix('.'))
                .is_some()
        })
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The file's size changed between grouping and hashing, so it can
    /// no longer belong to its size bucket.
    #[error("Size changed for {path}: expected {expected} bytes, found {actual}")]
    SizeChanged {
        /// Path of the file that changed
        path: PathBuf,
        /// Size recorded at enumeration time
        expected: u64,
        /// Size observed just before hashing
        actual: u64,
    },

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing was cancelled by a shutdown request.
    #[error("Hashing interrupted")]
    Interrupted,
}
