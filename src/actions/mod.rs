//! Actions taken on confirmed duplicates.
//!
//! The finder hands every newly confirmed duplicate (never the original) to
//! an [`ActionHandler`]:
//! - [`ActionHandler::NoOp`]: report only
//! - [`ActionHandler::Automatic`]: delete (or move to trash) without asking
//! - [`ActionHandler::Interactive`]: ask per file, then delete on `y`/`yes`
//!
//! Dry run applies to both deleting variants: intent is logged and nothing
//! is touched. For the interactive variant the question is still asked.
//!
//! ```no_run
//! use dupewalk::actions::{ActionHandler, ActionOutcome, DeleteConfig};
//! use std::path::Path;
//!
//! let mut handler = ActionHandler::Automatic(DeleteConfig::trash().with_dry_run(true));
//! let outcome = handler.remove(Path::new("/data/copy.iso"), None);
//! assert!(matches!(outcome, ActionOutcome::DryRun));
//! ```

pub mod delete;
pub mod prompt;

use std::path::Path;
use std::time::SystemTime;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_to_trash, permanent_delete, DeleteConfig, DeleteError, DeleteResult,
    FileSnapshot,
};
pub use prompt::Prompter;

/// What happened to a duplicate handed to the action.
#[derive(Debug)]
pub enum ActionOutcome {
    /// No action is configured.
    Ignored,
    /// Would have been removed (dry run).
    DryRun,
    /// Permanently deleted.
    Deleted {
        /// Bytes freed
        bytes: u64,
    },
    /// Moved to the system trash.
    Trashed {
        /// Bytes moved
        bytes: u64,
    },
    /// The user declined at the prompt.
    Skipped,
    /// Removal failed; the scan continues.
    Failed(DeleteError),
}

impl ActionOutcome {
    /// Bytes freed (or moved to trash) by this outcome.
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        match self {
            Self::Deleted { bytes } | Self::Trashed { bytes } => *bytes,
            _ => 0,
        }
    }
}

/// The action applied to each confirmed duplicate.
#[derive(Debug, Default)]
pub enum ActionHandler {
    /// Report only.
    #[default]
    NoOp,
    /// Remove without asking.
    Automatic(DeleteConfig),
    /// Ask before each removal.
    Interactive(Prompter, DeleteConfig),
}

impl ActionHandler {
    /// Whether this handler can remove files.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    /// Apply the action to one duplicate.
    ///
    /// `expected_mtime` is the modification time observed during the scan;
    /// see [`DeleteConfig::verify_mtime`]. Failures are logged and returned
    /// as [`ActionOutcome::Failed`], never propagated.
    pub fn remove(&mut self, path: &Path, expected_mtime: Option<SystemTime>) -> ActionOutcome {
        match self {
            Self::NoOp => ActionOutcome::Ignored,
            Self::Automatic(config) => execute(path, expected_mtime, config),
            Self::Interactive(prompter, config) => {
                if prompter.confirm_delete(path) {
                    execute(path, expected_mtime, config)
                } else {
                    log::info!("Skipped: {}", path.display());
                    ActionOutcome::Skipped
                }
            }
        }
    }
}

fn execute(path: &Path, expected_mtime: Option<SystemTime>, config: &DeleteConfig) -> ActionOutcome {
    if config.dry_run {
        let verb = if config.use_trash { "trash" } else { "delete" };
        log::info!("Dry run: would {} {}", verb, path.display());
        return ActionOutcome::DryRun;
    }

    match delete_file(path, expected_mtime, config) {
        Ok(result) if result.trashed => ActionOutcome::Trashed { bytes: result.size },
        Ok(result) => ActionOutcome::Deleted { bytes: result.size },
        Err(e) => {
            log::warn!("Failed to remove {}: {}", path.display(), e);
            ActionOutcome::Failed(e)
        }
    }
}
