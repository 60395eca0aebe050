//! Scan orchestration: walk, index, act, report.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one scan over one or more roots:
//!
//! 1. **Validate** - every root must exist and be a directory; roots are
//!    canonicalized and nested roots dropped
//! 2. **Walk** - each root in order, children sorted by name
//! 3. **Index** - every candidate goes through [`DuplicateIndex::consider`]
//! 4. **Act** - each new duplicate (never the original) is handed to the
//!    [`ActionHandler`]
//! 5. **Report** - each new pair is appended to the report as it is found
//!
//! Everything runs on the calling thread. The shutdown flag is checked
//! between candidates, never in the middle of a decision.
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::actions::ActionHandler;
//! use dupewalk::duplicates::{DuplicateFinder, FinderConfig};
//! use dupewalk::output::report::ReportWriter;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let mut action = ActionHandler::NoOp;
//! let (results, summary) = finder
//!     .find_duplicates_in_paths::<std::fs::File>(&[PathBuf::from(".")], &mut action, None)
//!     .unwrap();
//!
//! println!("{} files in {} pairs", results.len(), summary.duplicate_pairs);
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::index::{ConfirmedDuplicate, DuplicateIndex, Verdict};
use crate::actions::{ActionHandler, ActionOutcome};
use crate::output::report::ReportWriter;
use crate::progress::ProgressCallback;
use crate::scanner::{normalize_roots, HashError, Hasher, ScanError, Walker, WalkerConfig};
use crate::size::MEGABYTE;

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
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

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Canonical roots actually walked, in order
    pub roots: Vec<PathBuf>,
    /// Name pattern in effect (`None` matches everything)
    pub pattern: Option<String>,
    /// Size threshold in bytes
    pub min_size: u64,
    /// Regular files seen, before threshold and pattern filtering
    pub files_examined: usize,
    /// Files that passed the filters and reached the index
    pub candidates: usize,
    /// Checksums computed
    pub checksums_computed: usize,
    /// Confirmed duplicate pairs
    pub duplicate_pairs: usize,
    /// Total size of all duplicates (originals excluded)
    pub wasted_bytes: u64,
    /// Duplicates removed (deleted or trashed)
    pub files_removed: usize,
    /// Bytes freed by removal
    pub bytes_freed: u64,
    /// Duplicates the user declined to remove
    pub files_skipped: usize,
    /// Removals that failed
    pub removal_failures: usize,
    /// Report rows that could not be written
    pub report_failures: usize,
    /// Files excluded because they could not be hashed
    pub hash_errors: Vec<HashError>,
    /// Traversal errors (unreadable directories and the like)
    pub scan_errors: Vec<ScanError>,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Wasted space in whole megabytes.
    #[must_use]
    pub fn wasted_megabytes(&self) -> u64 {
        self.wasted_bytes / MEGABYTE
    }

    /// Wasted space as a human-readable string.
    #[must_use]
    pub fn wasted_display(&self) -> String {
        ByteSize::b(self.wasted_bytes).to_string()
    }

    /// Whether any per-file problem occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.hash_errors.is_empty()
            || !self.scan_errors.is_empty()
            || self.removal_failures > 0
            || self.report_failures > 0
    }

    fn record_outcome(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Deleted { bytes } | ActionOutcome::Trashed { bytes } => {
                self.files_removed += 1;
                self.bytes_freed += bytes;
            }
            ActionOutcome::Skipped => self.files_skipped += 1,
            ActionOutcome::Failed(_) => self.removal_failures += 1,
            ActionOutcome::Ignored | ActionOutcome::DryRun => {}
        }
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// No search root was given.
    #[error("No search path given")]
    NoPaths,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A scan error occurred.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

/// Duplicate finder that orchestrates one scan.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan a single directory without a report.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates_in_paths`].
    pub fn find_duplicates(
        &self,
        path: &Path,
        action: &mut ActionHandler,
    ) -> Result<(HashMap<PathBuf, ConfirmedDuplicate>, ScanSummary), FinderError> {
        self.find_duplicates_in_paths::<std::fs::File>(&[path.to_path_buf()], action, None)
    }

    /// Scan every root in order and return all confirmed files.
    ///
    /// # Arguments
    ///
    /// * `paths` - Search roots; traversal order across roots follows this order
    /// * `action` - Applied to each new duplicate
    /// * `report` - Receives each new pair as it is confirmed
    ///
    /// # Returns
    ///
    /// The map path -> [`ConfirmedDuplicate`] for originals and duplicates,
    /// plus a [`ScanSummary`].
    ///
    /// # Errors
    ///
    /// - `NoPaths` if `paths` is empty
    /// - `PathNotFound` / `NotADirectory` for an invalid root (before any walk)
    /// - `ScanError` for an invalid name pattern
    /// - `Interrupted` if the shutdown flag is set
    pub fn find_duplicates_in_paths<W: Write>(
        &self,
        paths: &[PathBuf],
        action: &mut ActionHandler,
        mut report: Option<&mut ReportWriter<W>>,
    ) -> Result<(HashMap<PathBuf, ConfirmedDuplicate>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if paths.is_empty() {
            return Err(FinderError::NoPaths);
        }

        let roots = normalize_roots(paths).map_err(|e| match e {
            ScanError::NotFound(p) => FinderError::PathNotFound(p),
            ScanError::NotADirectory(p) => FinderError::NotADirectory(p),
            other => FinderError::ScanError(other),
        })?;

        let mut summary = ScanSummary {
            roots: roots.clone(),
            pattern: self.config.walker_config.pattern.clone(),
            min_size: self.config.walker_config.min_size,
            ..ScanSummary::default()
        };

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start("scanning", 0);
        }

        let mut index = DuplicateIndex::new(&self.hasher);

        for root in &roots {
            log::info!("Scanning {}", root.display());
            if let Some(cb) = progress {
                cb.on_message(&format!("Scanning {}", root.display()));
            }

            let mut walker = Walker::new(root, self.config.walker_config.clone())?;
            if let Some(ref flag) = self.config.shutdown_flag {
                walker = walker.with_shutdown_flag(flag.clone());
            }

            for result in walker.walk() {
                if self.config.is_shutdown_requested() {
                    break;
                }

                let candidate = match result {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        summary.scan_errors.push(e);
                        continue;
                    }
                };

                summary.candidates += 1;
                if let Some(cb) = progress {
                    cb.on_progress(summary.candidates, &candidate.path.to_string_lossy());
                }

                match index.consider(candidate) {
                    Verdict::Duplicate(pair) => {
                        if let Some(cb) = progress {
                            cb.on_duplicate(&pair);
                        }
                        if let Some(writer) = report.as_mut() {
                            if let Err(e) = writer.write_pair(&pair) {
                                log::error!("Report row for {} lost: {}", pair.duplicate.display(), e);
                                summary.report_failures += 1;
                            }
                        }
                        let outcome = action.remove(&pair.duplicate, Some(pair.duplicate_modified));
                        summary.record_outcome(&outcome);
                    }
                    Verdict::Excluded(HashError::Interrupted(_)) => break,
                    Verdict::Excluded(e) => summary.hash_errors.push(e),
                    Verdict::FirstOfSize | Verdict::Unique | Verdict::AlreadySeen => {}
                }
            }

            summary.files_examined += walker.files_examined();

            if self.config.is_shutdown_requested() {
                if let Some(cb) = progress {
                    cb.on_phase_end("scanning");
                }
                log::info!("Scan interrupted after {} candidates", summary.candidates);
                return Err(FinderError::Interrupted);
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end("scanning");
        }

        let stats = index.stats().clone();
        summary.checksums_computed = stats.checksums_computed;
        summary.duplicate_pairs = stats.duplicates;
        summary.wasted_bytes = stats.wasted_bytes;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files examined, {} duplicate pairs, {} wasted",
            summary.files_examined,
            summary.duplicate_pairs,
            summary.wasted_display()
        );

        Ok((index.into_results(), summary))
    }
}
