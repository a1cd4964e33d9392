//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one root
//! directory and yielding every regular file beneath it, optionally
//! restricted to a set of file extensions.
//!
//! Directory entries are sorted during traversal so two walks over an
//! unchanged tree enumerate files in the same order.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     extensions: vec!["jpg".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery under a single root.
///
/// Roots are walked one at a time; the pipeline constructs one walker
/// per valid root so an invalid root can be skipped without abandoning
/// the others.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker will stop iteration
    /// as soon as possible. This allows for clean Ctrl+C handling.
    ///
    /// # Arguments
    ///
    /// * `flag` - Atomic boolean flag shared across threads
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Returns an iterator over [`FileRecord`] results. Errors are
    /// yielded as [`ScanError`] values rather than stopping iteration,
    /// so one unreadable entry never abandons the rest of the tree.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        // jwalk skips dotfiles unless told otherwise; every regular
        // file is a candidate here.
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| {
            // Check shutdown flag periodically
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    // Skip the root directory itself
                    if path == self.root {
                        return None;
                    }

                    let file_type = entry.file_type();

                    // Directories are traversed, never yielded
                    if file_type.is_dir() {
                        return None;
                    }

                    // Extension filtering needs only the name, so it
                    // runs before any metadata lookup
                    if !self.config.matches_extension(&path) {
                        log::trace!("Skipping file outside extension filter: {}", path.display());
                        return None;
                    }

                    let is_symlink = file_type.is_symlink();
                    if is_symlink && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    // Get metadata (follow symlinks if configured)
                    let metadata = if self.config.follow_symlinks {
                        std::fs::metadata(&path)
                    } else {
                        std::fs::symlink_metadata(&path)
                    };

                    let metadata = match metadata {
                        Ok(m) => m,
                        Err(e) => {
                            return Some(self.handle_io_error(&path, e));
                        }
                    };

                    // Only regular files feed the pipeline
                    if !metadata.is_file() {
                        return None;
                    }

                    Some(Ok(FileRecord::new(path, metadata.len())))
                }
                Err(e) => {
                    // Convert jwalk error to ScanError
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(self.handle_jwalk_error(path, e))
                }
            }
        })
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> Result<FileRecord, ScanError> {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Err(ScanError::PermissionDenied(path.to_path_buf()))
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                Err(ScanError::NotFound(path.to_path_buf()))
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }

    /// Handle jwalk errors.
    fn handle_jwalk_error(
        &self,
        path: PathBuf,
        error: jwalk::Error,
    ) -> Result<FileRecord, ScanError> {
        log::warn!("Walker error for {}: {}", path.display(), error);
        Err(ScanError::Io {
            path,
            source: std::io::Error::other(error.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let file1 = dir.path().join("file1.txt");
        let mut f = File::create(&file1).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let file2 = dir.path().join("file2.txt");
        let mut f = File::create(&file2).unwrap();
        writeln!(f, "Another file").unwrap();

        // Create a subdirectory with a file
        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let file3 = subdir.join("nested.txt");
        let mut f = File::create(&file3).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    #[test]
    fn test_walker_finds_files() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path(), WalkerConfig::default());

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);

        for file in &files {
            assert!(file.size > 0);
            assert!(file.path.exists());
            assert!(file.digest.is_none());
        }
    }

    #[test]
    fn test_walker_extension_filter() {
        let dir = create_test_dir();

        let photo = dir.path().join("photo.jpg");
        let mut f = File::create(&photo).unwrap();
        writeln!(f, "jpeg bytes").unwrap();

        let config = WalkerConfig {
            extensions: vec!["jpg".to_string()],
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.file_name().unwrap(), "photo.jpg");
    }

    #[test]
    fn test_walker_extension_filter_is_case_sensitive() {
        let dir = TempDir::new().unwrap();

        let upper = dir.path().join("photo.JPG");
        let mut f = File::create(&upper).unwrap();
        writeln!(f, "upper case").unwrap();

        let lower = dir.path().join("other.jpg");
        let mut f = File::create(&lower).unwrap();
        writeln!(f, "lower case").unwrap();

        let config = WalkerConfig {
            extensions: vec!["jpg".to_string()],
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.file_name().unwrap(), "other.jpg");
    }

    #[test]
    fn test_walker_includes_empty_files() {
        let dir = create_test_dir();

        File::create(dir.path().join("empty.txt")).unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        // Empty files are ordinary candidates: they all share size 0
        // and may be duplicates of each other.
        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|f| f.size == 0));
    }

    #[test]
    fn test_walker_includes_hidden_files() {
        let dir = create_test_dir();

        let hidden = dir.path().join(".hidden");
        let mut f = File::create(&hidden).unwrap();
        writeln!(f, "Hidden content").unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert!(files
            .iter()
            .any(|f| f.path.file_name().is_some_and(|n| n == ".hidden")));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_skips_symlinks_by_default() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);
        assert!(!files
            .iter()
            .any(|f| f.path.file_name().is_some_and(|n| n == "link.txt")));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_follows_symlinks_when_asked() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();

        let config = WalkerConfig {
            follow_symlinks: true,
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 4);
        assert!(files
            .iter()
            .any(|f| f.path.file_name().is_some_and(|n| n == "link.txt")));
    }

    #[test]
    fn test_walker_deterministic_order() {
        let dir = create_test_dir();

        for i in 0..20 {
            let file = dir.path().join(format!("extra{i:02}.dat"));
            let mut f = File::create(&file).unwrap();
            writeln!(f, "Content {}", i).unwrap();
        }

        let config = WalkerConfig::default();
        let first: Vec<_> = Walker::new(dir.path(), config.clone())
            .walk()
            .filter_map(Result::ok)
            .map(|f| f.path)
            .collect();
        let second: Vec<_> = Walker::new(dir.path(), config)
            .walk()
            .filter_map(Result::ok)
            .map(|f| f.path)
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_walker_shutdown_flag() {
        let dir = create_test_dir();

        // Create many files
        for i in 0..10 {
            let file = dir.path().join(format!("file{}.txt", i));
            let mut f = File::create(&file).unwrap();
            writeln!(f, "Content {}", i).unwrap();
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let walker = Walker::new(dir.path(), WalkerConfig::default())
            .with_shutdown_flag(Arc::clone(&shutdown));

        // Set shutdown flag immediately
        shutdown.store(true, Ordering::SeqCst);

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        // With shutdown flag set, we should get very few or no files
        // (depending on timing, might get a few before the flag is checked)
        assert!(
            files.len() < 5,
            "Expected early termination, got {} files",
            files.len()
        );
    }

    #[test]
    fn test_walker_handles_nonexistent_path() {
        let walker = Walker::new(
            Path::new("/nonexistent/path/12345"),
            WalkerConfig::default(),
        );

        let results: Vec<_> = walker.walk().collect();

        // Should produce errors, not panic
        assert!(results.is_empty() || results.iter().all(|r| r.is_err()));
    }
}
