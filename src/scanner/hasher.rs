//! Streaming content digests for duplicate confirmation.
//!
//! # Overview
//!
//! This module computes a fixed-size digest over a file's full byte
//! contents, reading in fixed-size chunks so memory use stays constant
//! regardless of file size. Three algorithms are supported: SHA-256
//! (the default), BLAKE3, and MD5.
//!
//! Before reading, the file is re-validated against the size recorded
//! at enumeration time. The filesystem may have changed since then; a
//! file that vanished or changed size is reported as a [`HashError`]
//! and excluded from grouping rather than aborting the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{DigestKind, FileHasher};
//! use std::path::Path;
//!
//! let hasher = FileHasher::new(DigestKind::Sha256);
//! let digest = hasher.hash_file(Path::new("photo.jpg"), 1024).unwrap();
//! println!("{}", digest.to_hex());
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use sha2::Digest as _;

use super::HashError;

/// Read buffer size for streaming hash computation.
const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Digest algorithm used for content comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestKind {
    /// SHA-256: cryptographic, the default.
    #[default]
    Sha256,
    /// BLAKE3: cryptographic, fastest of the three.
    Blake3,
    /// MD5: legacy choice; fine for opportunistic dedup, weak against
    /// adversarial collisions.
    Md5,
}

impl DigestKind {
    /// Digest output length in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 32,
            Self::Md5 => 16,
        }
    }

    /// Algorithm name as shown in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
            Self::Md5 => "md5",
        }
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A computed content digest.
///
/// Stores up to 32 bytes of digest output; MD5 fills 16, SHA-256 and
/// BLAKE3 fill all 32. Equality covers both the bytes and the length,
/// so digests of different widths never compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest {
    bytes: [u8; 32],
    len: u8,
}

impl Digest {
    /// Build a digest from raw algorithm output.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is longer than 32 bytes.
    #[must_use]
    pub fn from_bytes(raw: &[u8]) -> Self {
        assert!(raw.len() <= 32, "digest output exceeds 32 bytes");
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Self {
            bytes,
            len: raw.len() as u8,
        }
    }

    /// Digest bytes actually produced by the algorithm.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Lowercase hex rendering, as used in reports and exports.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// In-flight digest computation for one file.
enum DigestState {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
    Md5(md5::Md5),
}

impl DigestState {
    fn new(kind: DigestKind) -> Self {
        match kind {
            DigestKind::Sha256 => Self::Sha256(sha2::Sha256::new()),
            DigestKind::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            DigestKind::Md5 => Self::Md5(md5::Md5::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
            Self::Md5(h) => h.update(data),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Sha256(h) => Digest::from_bytes(&h.finalize()),
            Self::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
            Self::Md5(h) => Digest::from_bytes(&h.finalize()),
        }
    }
}

/// Streaming file hasher.
///
/// Re-validates a file against its recorded size, then streams the
/// contents through the configured digest algorithm. The hasher counts
/// how many files it has been asked to hash, which makes it easy to
/// verify that uniquely-sized files are never hashed at all.
#[derive(Debug)]
pub struct FileHasher {
    kind: DigestKind,
    invocations: AtomicUsize,
}

impl FileHasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(kind: DigestKind) -> Self {
        Self {
            kind,
            invocations: AtomicUsize::new(0),
        }
    }

    /// The algorithm this hasher applies.
    #[must_use]
    pub fn kind(&self) -> DigestKind {
        self.kind
    }

    /// Number of files this hasher has been asked to hash so far.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Hash the full contents of a file.
    ///
    /// `expected_size` is the size recorded at enumeration time; a file
    /// whose current size differs is rejected with
    /// [`HashError::SizeChanged`] since it can no longer belong to its
    /// size bucket.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the file vanished, is unreadable, or
    /// changed size since enumeration.
    pub fn hash_file(&self, path: &Path, expected_size: u64) -> Result<Digest, HashError> {
        self.invocations.fetch_add(1, Ordering::Relaxed);

        let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
        let actual = metadata.len();
        if actual != expected_size {
            return Err(HashError::SizeChanged {
                path: path.to_path_buf(),
                expected: expected_size,
                actual,
            });
        }

        let file = File::open(path).map_err(|e| io_error(path, e))?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut state = DigestState::new(self.kind);
        let mut buffer = [0u8; READ_BUFFER_SIZE];

        loop {
            let n = reader.read(&mut buffer).map_err(|e| io_error(path, e))?;
            if n == 0 {
                break;
            }
            state.update(&buffer[..n]);
        }

        Ok(state.finalize())
    }
}

/// Map an I/O error to the matching `HashError` variant.
fn io_error(path: &Path, error: std::io::Error) -> HashError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
