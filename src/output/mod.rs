//! Output for scan results.
//!
//! This module provides:
//! - [`report`]: the tab- or comma-delimited duplicate report, streamed
//!   pair by pair
//! - [`summary`]: console lines per pair and the end-of-run summary

pub mod report;
pub mod summary;

// Re-export main types
pub use report::{ReportDelimiter, ReportError, ReportWriter};
pub use summary::{format_pair_line, render_summary};
