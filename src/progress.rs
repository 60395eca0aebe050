//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to show a spinner while the scan runs and to print
//! one console line per confirmed duplicate pair.
//!
//! Pair lines are printed through the spinner's [`MultiProgress`] so they
//! do not tear the spinner line. With the spinner disabled they go straight
//! to stdout.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::duplicates::DuplicatePair;
use crate::output::summary::format_pair_line;

/// Progress callback for the scan.
///
/// Implement this trait to receive progress updates while the finder runs.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "scanning")
    /// * `total` - Total number of items, or 0 when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each candidate processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a duplicate pair is confirmed.
    fn on_duplicate(&self, _pair: &DuplicatePair) {}

    /// Called when a phase completes.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
    show_spinner: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is displayed at all.
    /// * `show_spinner` - If false, only the per-pair lines are printed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupewalk::progress::Progress;
    ///
    /// let progress = Progress::new(false, true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool, show_spinner: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            spinner: Mutex::new(None),
            quiet,
            show_spinner,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} candidates")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        if self.quiet || !self.show_spinner {
            return;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("{phase}..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        let message = truncate_path(path, 40);
        self.with_spinner(|pb| {
            pb.set_position(current as u64);
            pb.set_message(message);
        });
    }

    fn on_duplicate(&self, pair: &DuplicatePair) {
        if self.quiet {
            return;
        }
        let line = format_pair_line(pair);
        if self.show_spinner {
            if self.multi.println(&line).is_err() {
                println!("{line}");
            }
        } else {
            println!("{line}");
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
                log::debug!("Phase {} complete", phase);
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        let message = message.to_string();
        self.with_spinner(|pb| pb.set_message(message));
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let chars: Vec<char> = file_name.chars().collect();
    if chars.len() + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = chars[chars.len().saturating_sub(keep)..].iter().collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
