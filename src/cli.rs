//! Command-line interface definitions for dupewalk.
//!
//! This module defines all CLI arguments using the clap derive API. Options
//! that can also come from the config file are `Option`s (or flags that only
//! ever switch something on) so that "not given" never overrides the file.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates of 1 MB and over under the current directory
//! dupewalk .
//!
//! # Only ISO images of 100 MB and over, across two trees
//! dupewalk -s 100MB -p '*.iso' /data /backup
//!
//! # Ask before deleting each duplicate
//! dupewalk -i ~/Downloads
//!
//! # See what automatic deletion would remove
//! dupewalk -d -n ~/Downloads
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::output::report::ReportDelimiter;

/// Find duplicate files: size buckets first, full-content checksums second.
///
/// Writes a report of every duplicate pair and can delete duplicates
/// automatically or after asking. The first file seen with some content is
/// always kept.
#[derive(Debug, Parser)]
#[command(name = "dupewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to search, in order
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Minimum file size, e.g. 512bytes, 10KB, 10MB, 1GB (no unit means MB)
    #[arg(short, long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Name pattern matched against the full path, e.g. '*.iso', '*music[0-5].mp3'
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Where to write the duplicate report [default: DupewalkReport.csv]
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report field delimiter [default: tab]
    #[arg(long, value_enum, value_name = "DELIMITER")]
    pub delimiter: Option<ReportDelimiter>,

    /// Delete every duplicate found (the first copy is kept)
    #[arg(short, long, conflicts_with = "interactive")]
    pub delete: bool,

    /// Ask before deleting each duplicate
    #[arg(short, long)]
    pub interactive: bool,

    /// Only log what would be deleted
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Move duplicates to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Follow symbolic links during the walk
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}
