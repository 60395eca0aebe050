//! Scanner module for directory traversal and file checksums.
//!
//! This module provides functionality for:
//! - Directory walking using jwalk, in a deterministic (sorted) order
//! - Size threshold and name pattern filtering
//! - Full-content checksums with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: Streaming BLAKE3 checksums behind the [`ChecksumProvider`] seam
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024,
//!     pattern: Some("*.iso".to_string()),
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config).unwrap();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use hasher::{hash_to_hex, ChecksumProvider, Digest, Hasher, CHUNK_SIZE};
pub use walker::{normalize_roots, Walker};

/// An observed filesystem entry that passed the walker's filters.
///
/// Candidates are ephemeral: produced by traversal and consumed immediately
/// by the duplicate index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// File extension without the leading dot
    pub extension: Option<String>,
}

impl FileCandidate {
    /// Create a candidate from already known attributes.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            size,
            modified,
            extension,
        }
    }

    /// Build a candidate from a path and its metadata.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let extension = extension_of(&path);
        Self {
            path,
            size: metadata.len(),
            modified,
            extension,
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().into_owned())
}

/// Configuration for directory walking.
///
/// Controls the size threshold, the name pattern and symlink handling.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Minimum file size to include (in bytes). Files smaller than this
    /// are counted as examined but never become candidates.
    pub min_size: u64,

    /// Glob pattern matched against the full path (`*` matches across
    /// separators). `None` matches everything.
    pub pattern: Option<String>,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `min_size` - Size threshold in bytes
    /// * `pattern` - Glob pattern, `None` or `"*"` for all files
    #[must_use]
    pub fn new(follow_symlinks: bool, min_size: u64, pattern: Option<String>) -> Self {
        Self {
            follow_symlinks,
            min_size,
            pattern,
        }
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

    /// The name pattern is not a valid glob.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Parser message
        message: String,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("Walk error: {0}")]
    Walk(String),
}

/// Errors that can occur while checksumming a file.
///
/// Every variant excludes the file from duplicate consideration; none of
/// them aborts a scan.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// Reading stopped because shutdown was requested.
    #[error("Checksum interrupted: {0}")]
    Interrupted(PathBuf),

    /// Any other I/O error while opening or reading the file.
    #[error("I/O error for {path}: {source}")]
    Unreadable {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Map an I/O error for `path` to the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Unreadable {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// The file this error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::Interrupted(p)
            | Self::Unreadable { path: p, .. } => p,
        }
    }
}
