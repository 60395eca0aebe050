//! Console output for a scan: per-pair lines and the end-of-run summary.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use crate::duplicates::{DuplicatePair, ScanSummary};
use crate::size::MEGABYTE;

/// One console line for a newly confirmed pair:
/// `<n> MB  ORIG: <path>  DUPE: <path>`.
#[must_use]
pub fn format_pair_line(pair: &DuplicatePair) -> String {
    format!(
        "{} MB  ORIG: {}  DUPE: {}",
        pair.size / MEGABYTE,
        pair.original.display(),
        pair.duplicate.display()
    )
}

/// Line printed before scanning starts.
#[must_use]
pub fn format_banner(min_size: u64) -> String {
    format!(
        "Printing dupes of {} MB and over using BLAKE3 checksums: [SIZE] [ORIG] [DUPE]",
        min_size / MEGABYTE
    )
}

/// Render elapsed time as `1h 02m 03s`, `2m 05s` or `4.2s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

/// The end-of-run report.
///
/// # Arguments
///
/// * `summary` - Scan statistics
/// * `report_path` - Where the report was written, if anywhere
/// * `config_path` - The config file that was loaded, if any
#[must_use]
pub fn render_summary(
    summary: &ScanSummary,
    report_path: Option<&Path>,
    config_path: Option<&Path>,
) -> String {
    let roots = summary
        .roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "DUPEWALK REPORT");
    let _ = writeln!(out, "Search Path:                 {roots}");
    let _ = writeln!(
        out,
        "Filtered For Pattern Match:  {}",
        summary.pattern.as_deref().unwrap_or("*")
    );
    if let Some(config) = config_path {
        let _ = writeln!(out, "Used config file:            {}", config.display());
    }
    let _ = writeln!(out, "Total Files Searched:        {}", summary.files_examined);
    let _ = writeln!(out, "Duplicate Pairs:             {}", summary.duplicate_pairs);
    let _ = writeln!(
        out,
        "Wasted Space in Duplicates:  {} MB ({})",
        summary.wasted_megabytes(),
        summary.wasted_display()
    );
    if summary.files_removed > 0 || summary.removal_failures > 0 || summary.files_skipped > 0 {
        let _ = writeln!(
            out,
            "Removed:                     {} files, {} freed ({} skipped, {} failed)",
            summary.files_removed,
            bytesize::ByteSize::b(summary.bytes_freed),
            summary.files_skipped,
            summary.removal_failures
        );
    }
    let errors = summary.hash_errors.len() + summary.scan_errors.len();
    if errors > 0 {
        let _ = writeln!(out, "Unreadable Entries:          {errors}");
    }
    if let Some(report) = report_path {
        let _ = writeln!(out, "Report Generated at:         {}", report.display());
    }
    let _ = writeln!(
        out,
        "Search Time:                 {}",
        format_duration(summary.scan_duration)
    );
    out
}
