//! Duplicate removal: permanent deletion or move to the system trash.
//!
//! # Overview
//!
//! This module removes a single confirmed duplicate:
//! - Permanent deletion via `std::fs::remove_file` (default)
//! - Move to system trash with the `trash` crate (recoverable)
//! - Optional check that the file was not modified since it was scanned
//!
//! Only duplicates are ever handed to these functions; the original of a
//! pair is never removed.
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::actions::delete::{delete_file, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.iso");
//! match delete_file(&path, None, &DeleteConfig::trash()) {
//!     Ok(result) => println!("Removed: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File was modified between scan and deletion.
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("deletion failed for {path}: {message}")]
    DeletionFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::TrashFailed { path: p, .. }
            | Self::DeletionFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_metadata_error(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was removed.
    pub path: PathBuf,
    /// Size of the removed file in bytes.
    pub size: u64,
    /// Whether the file went to the trash (true) or was deleted (false).
    pub trashed: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, trashed: bool) -> Self {
        Self {
            path,
            size,
            trashed,
        }
    }
}

/// Configuration for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Log what would be removed without touching the filesystem.
    pub dry_run: bool,
    /// Move to the system trash instead of deleting permanently.
    pub use_trash: bool,
    /// Refuse to delete a file whose modification time changed since scan.
    pub verify_mtime: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            use_trash: false,
            verify_mtime: true,
        }
    }
}

impl DeleteConfig {
    /// Config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Config for moving files to the trash.
    #[must_use]
    pub fn trash() -> Self {
        Self {
            use_trash: true,
            ..Self::default()
        }
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable/disable modification-time verification.
    #[must_use]
    pub fn with_verify_mtime(mut self, verify: bool) -> Self {
        self.verify_mtime = verify;
        self
    }
}

/// File metadata snapshot used to detect changes before deletion.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
}

impl FileSnapshot {
    /// Capture a file's current state.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, DeleteError> {
        let metadata = fs::metadata(path).map_err(|e| DeleteError::from_metadata_error(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().ok(),
        })
    }

    /// Check the snapshot against an expected modification time.
    ///
    /// # Errors
    ///
    /// Returns `Modified` if both times are known and differ.
    pub fn verify_mtime(&self, expected: Option<SystemTime>) -> Result<(), DeleteError> {
        if let (Some(expected), Some(actual)) = (expected, self.mtime) {
            if expected != actual {
                log::warn!(
                    "File modified since scan: {} (mtime changed)",
                    self.path.display()
                );
                return Err(DeleteError::Modified(self.path.clone()));
            }
        }
        Ok(())
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = FileSnapshot::capture(path)?.size;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `DeletionFailed` if the removal fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = FileSnapshot::capture(path)?.size;

    fs::remove_file(path).map_err(|e| DeleteError::DeletionFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Remove a duplicate according to `config`.
///
/// When `config.verify_mtime` is set, the file's current modification time
/// must equal `expected_mtime` (the time observed during the scan). Dry run
/// is not handled here; callers decide before calling.
///
/// # Errors
///
/// - `Modified` if the file changed since it was scanned
/// - Other errors from [`delete_to_trash`] or [`permanent_delete`]
pub fn delete_file(
    path: &Path,
    expected_mtime: Option<SystemTime>,
    config: &DeleteConfig,
) -> Result<DeleteResult, DeleteError> {
    if config.verify_mtime {
        FileSnapshot::capture(path)?.verify_mtime(expected_mtime)?;
    }

    if config.use_trash {
        delete_to_trash(path)
    } else {
        permanent_delete(path)
    }
}
