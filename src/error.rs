//! Exit codes and structured error output.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: scan completed, duplicates found
/// - 1: fatal error
/// - 2: scan completed, no duplicates
/// - 3: scan completed, some files could not be read, removed or reported
/// - 130: interrupted (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates were found.
    Success = 0,
    /// A fatal error occurred.
    GeneralError = 1,
    /// No duplicates were found.
    NoDuplicates = 2,
    /// Finished with per-file errors.
    PartialSuccess = 3,
    /// Interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code shown with errors.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DW000",
            Self::GeneralError => "DW001",
            Self::NoDuplicates => "DW002",
            Self::PartialSuccess => "DW003",
            Self::Interrupted => "DW130",
        }
    }

    /// Exit code for a finished scan.
    #[must_use]
    pub fn for_scan(duplicate_pairs: usize, has_errors: bool) -> Self {
        if has_errors {
            Self::PartialSuccess
        } else if duplicate_pairs > 0 {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }
}

/// Error as printed with `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DW001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the scan was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Build from an application error and the exit code it maps to.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
