//! dupewalk - duplicate file finder
//!
//! Walks one or more directory trees, buckets files by exact size and only
//! computes BLAKE3 checksums for files whose size was seen before. The first
//! file seen with some content is the original; every later file with the
//! same checksum is reported as its duplicate and can be deleted.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod size;

use std::sync::Arc;

use anyhow::Context;

use crate::actions::{ActionHandler, Prompter};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::report::ReportWriter;
use crate::output::summary::{format_banner, render_summary};
use crate::progress::Progress;

/// Run one scan as described by `cli`.
///
/// Layers the configuration, validates size and roots, opens the report,
/// runs the finder and prints the summary.
///
/// # Errors
///
/// Returns an error for anything fatal: a bad config file or size
/// expression, an invalid root, an unwritable report, or an interrupted
/// scan (`FinderError::Interrupted`, which `main` maps to exit code 130).
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let (mut config, config_path) = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::Success);
    }

    let walker_config = config.walker_config()?;
    let min_size = walker_config.min_size;
    let paths = config.search_paths();
    if paths.is_empty() {
        return Err(duplicates::FinderError::NoPaths.into());
    }
    // Fail on a bad root or pattern before the report file is touched
    scanner::normalize_roots(&paths)?;
    walker_config.validate()?;

    let delete_config = config.delete_config();
    let mut action = if config.interactive {
        ActionHandler::Interactive(Prompter::stdio(), delete_config)
    } else if config.delete {
        ActionHandler::Automatic(delete_config)
    } else {
        ActionHandler::NoOp
    };

    let shutdown = signal::install_handler()?;
    let show_spinner = !cli.no_progress && !config.interactive;
    let progress = Arc::new(Progress::new(cli.quiet, show_spinner));

    let finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(progress);

    let mut report = ReportWriter::create(&config.report, config.delimiter)?;

    if !cli.quiet {
        println!("{}", format_banner(min_size));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (_, summary) = finder.find_duplicates_in_paths(&paths, &mut action, Some(&mut report))?;

    report
        .finish()
        .with_context(|| format!("finishing report {}", config.report.display()))?;

    log::debug!(
        "{} candidates, {} checksums, {} pairs",
        summary.candidates,
        summary.checksums_computed,
        summary.duplicate_pairs
    );

    if !cli.quiet {
        print!(
            "{}",
            render_summary(&summary, Some(&config.report), config_path.as_deref())
        );
    }

    Ok(ExitCode::for_scan(summary.duplicate_pairs, summary.has_errors()))
}
