//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one directory
//! tree and yielding [`FileCandidate`]s for the duplicate index, plus
//! [`normalize_roots`] for validating and de-overlapping several roots.
//!
//! # Features
//!
//! - Directory entries sorted by name, so "first seen" is deterministic
//! - Size threshold filtering (`size >= min_size`)
//! - Glob name pattern matched against the full path
//! - Symlinks skipped unless `follow_symlinks` is set
//! - Count of every regular file examined, before filtering
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config).unwrap();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! println!("{} files examined", walker.files_examined());
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use glob::Pattern;
use jwalk::WalkDir;

use super::{FileCandidate, ScanError, WalkerConfig};

/// Directory walker for candidate discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Compiled name pattern (`None` matches everything)
    pattern: Option<Pattern>,
    /// Regular files seen so far, filtered or not
    examined: AtomicUsize,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] if the name pattern is not a
    /// valid glob.
    pub fn new(path: &Path, config: WalkerConfig) -> Result<Self, ScanError> {
        let pattern = compile_pattern(config.pattern.as_deref())?;
        Ok(Self {
            root: path.to_path_buf(),
            config,
            pattern,
            examined: AtomicUsize::new(0),
            shutdown_flag: None,
        })
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of regular files seen so far, including filtered ones.
    #[must_use]
    pub fn files_examined(&self) -> usize {
        self.examined.load(Ordering::Relaxed)
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check a file against the size threshold and name pattern.
    fn passes_filters(&self, path: &Path, size: u64) -> bool {
        if size < self.config.min_size {
            log::trace!("Below size threshold ({} bytes): {}", size, path.display());
            return false;
        }
        if let Some(ref pattern) = self.pattern {
            if !pattern.matches_path(path) {
                log::trace!("Pattern mismatch: {}", path.display());
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding candidates that pass the filters.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Entries within a directory come out sorted by file name.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileCandidate, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir
            .into_iter()
            .take_while(move |_| {
                let stop = self.is_shutdown_requested();
                if stop {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                }
                !stop
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    let metadata = match std::fs::metadata(&path) {
                        Ok(m) => m,
                        Err(e) => return Some(Err(self.handle_io_error(&path, e))),
                    };

                    if !metadata.is_file() {
                        return None;
                    }

                    self.process_file(path, &metadata)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Walk(format!("{}: {}", path.display(), e))))
                }
            })
    }

    /// Count a regular file and turn it into a candidate if it passes.
    ///
    /// When following links the candidate carries the file's canonical
    /// path, so a link and its target (or a linked directory and the real
    /// one) resolve to the same path and the index never pairs a file with
    /// itself.
    fn process_file(
        &self,
        path: PathBuf,
        metadata: &Metadata,
    ) -> Option<Result<FileCandidate, ScanError>> {
        self.examined.fetch_add(1, Ordering::Relaxed);

        if !self.passes_filters(&path, metadata.len()) {
            return None;
        }

        if !self.config.follow_symlinks {
            return Some(Ok(FileCandidate::from_metadata(path, metadata)));
        }

        match std::fs::canonicalize(&path) {
            Ok(real) => {
                if real != path {
                    log::trace!("Resolved {} to {}", path.display(), real.display());
                }
                Some(Ok(FileCandidate::from_metadata(real, metadata)))
            }
            Err(e) => Some(Err(self.handle_io_error(&path, e))),
        }
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }
}

impl WalkerConfig {
    /// Check the name pattern without walking anything.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] for a malformed glob.
    pub fn validate(&self) -> Result<(), ScanError> {
        compile_pattern(self.pattern.as_deref()).map(|_| ())
    }
}

/// Compile a name pattern. `None`, empty and `"*"` all mean "match everything".
fn compile_pattern(pattern: Option<&str>) -> Result<Option<Pattern>, ScanError> {
    match pattern {
        None | Some("") | Some("*") => Ok(None),
        Some(p) => Pattern::new(p)
            .map(Some)
            .map_err(|e| ScanError::InvalidPattern {
                pattern: p.to_string(),
                message: e.msg.to_string(),
            }),
    }
}

/// Validate, canonicalize and de-overlap search roots.
///
/// Roots keep their given order. A root equal to or nested inside an
/// earlier-kept root is dropped; a root that contains earlier-kept roots
/// replaces them at the position of the first one.
///
/// # Errors
///
/// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`] for the
/// first invalid root.
pub fn normalize_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut roots: Vec<PathBuf> = Vec::with_capacity(paths.len());

    for path in paths {
        if !path.exists() {
            return Err(ScanError::NotFound(path.clone()));
        }
        if !path.is_dir() {
            return Err(ScanError::NotADirectory(path.clone()));
        }
        let canonical = path.canonicalize().map_err(|e| ScanError::Io {
            path: path.clone(),
            source: e,
        })?;

        if roots.iter().any(|r| canonical.starts_with(r)) {
            log::debug!("Skipping overlapping root: {}", path.display());
            continue;
        }

        match roots.iter().position(|r| r.starts_with(&canonical)) {
            Some(first) => {
                roots.retain(|r| !r.starts_with(&canonical));
                roots.insert(first.min(roots.len()), canonical);
            }
            None => roots.push(canonical),
        }
    }

    Ok(roots)
}
