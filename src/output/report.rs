//! Tabular duplicate report.
//!
//! The report is written as pairs are confirmed, so a partial report
//! survives an interrupted scan.
//!
//! # Layout
//!
//! ```text
//! Path                    Size    ModDate
//!
//! /data/a.iso             7 MB    01/31/2024 09:15:02 PM
//! /data/copy/a.iso        7 MB    02/01/2024 10:00:00 AM
//! ```
//!
//! - A header row `Path`, `Size`, `ModDate`
//! - Per pair: an empty separator row, the original, then the duplicate
//! - Size in whole megabytes with an `MB` suffix
//! - Modification time as `MM/DD/YYYY hh:mm:ss AM/PM` in local time
//! - Tab-delimited by default, comma optional
//!
//! # Example
//!
//! ```no_run
//! use dupewalk::output::report::{ReportDelimiter, ReportWriter};
//! use std::path::Path;
//!
//! let mut report = ReportWriter::create(Path::new("DupewalkReport.csv"), ReportDelimiter::Tab).unwrap();
//! // ... report.write_pair(&pair) for every confirmed pair
//! report.finish().unwrap();
//! ```

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::DuplicatePair;
use crate::size::format_megabytes;

/// strftime pattern for the `ModDate` column.
pub const REPORT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Header row of every report.
pub const REPORT_HEADER: [&str; 3] = ["Path", "Size", "ModDate"];

/// Errors that can occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be created.
    #[error("cannot create report {path}: {source}")]
    Create {
        /// Requested report location
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A row could not be written.
    #[error("cannot write report row: {0}")]
    Write(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Field delimiter of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportDelimiter {
    /// Tab-separated (spreadsheet friendly)
    #[default]
    Tab,
    /// Comma-separated
    Comma,
}

impl ReportDelimiter {
    /// The delimiter byte.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
        }
    }
}

impl fmt::Display for ReportDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab => f.write_str("tab"),
            Self::Comma => f.write_str("comma"),
        }
    }
}

impl FromStr for ReportDelimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "\t" => Ok(Self::Tab),
            "comma" | "," => Ok(Self::Comma),
            other => Err(format!("unknown delimiter '{other}' (expected tab or comma)")),
        }
    }
}

/// Format a timestamp for the `ModDate` column (local time).
#[must_use]
pub fn format_report_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format(REPORT_DATE_FORMAT).to_string()
}

/// Streaming report writer.
pub struct ReportWriter<W: io::Write> {
    writer: csv::Writer<W>,
    pairs: usize,
}

impl<W: io::Write> fmt::Debug for ReportWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportWriter")
            .field("pairs", &self.pairs)
            .finish_non_exhaustive()
    }
}

impl ReportWriter<File> {
    /// Create (or truncate) the report file and write the header.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Create`] if the file cannot be opened, or a
    /// write error for the header row.
    pub fn create(path: &Path, delimiter: ReportDelimiter) -> Result<Self, ReportError> {
        let file = File::create(path).map_err(|source| ReportError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Writing report to {}", path.display());
        Self::from_writer(file, delimiter)
    }
}

impl<W: io::Write> ReportWriter<W> {
    /// Wrap any writer and write the header row.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the header cannot be written.
    pub fn from_writer(writer: W, delimiter: ReportDelimiter) -> Result<Self, ReportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(writer);
        writer.write_record(REPORT_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, pairs: 0 })
    }

    /// Append one confirmed pair: separator, original, duplicate.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if a row cannot be written. Callers log this
    /// and continue.
    pub fn write_pair(&mut self, pair: &DuplicatePair) -> Result<(), ReportError> {
        let size = format_megabytes(pair.size);

        self.writer.write_record(["", "", ""])?;
        self.writer.write_record([
            pair.original.to_string_lossy().as_ref(),
            size.as_str(),
            format_report_date(pair.original_modified).as_str(),
        ])?;
        self.writer.write_record([
            pair.duplicate.to_string_lossy().as_ref(),
            size.as_str(),
            format_report_date(pair.duplicate_modified).as_str(),
        ])?;
        self.writer.flush()?;

        self.pairs += 1;
        Ok(())
    }

    /// Number of pairs written so far.
    #[must_use]
    pub fn pairs_written(&self) -> usize {
        self.pairs
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the final flush fails.
    pub fn finish(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}
