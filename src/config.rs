//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: the one given with `--config`, or the platform default
//!    (`dupewalk/config.toml` under the user config directory) if it exists
//! 3. Environment variables prefixed with `DUPEWALK_` (e.g. `DUPEWALK_SIZE=10MB`)
//! 4. Command-line flags ([`Config::apply_cli`])
//!
//! # Example file
//!
//! ```toml
//! paths = ["/data", "/backup"]
//! size = "100MB"
//! pattern = "*.iso"
//! report = "/tmp/dupes.csv"
//! delimiter = "comma"
//! trash = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::actions::DeleteConfig;
use crate::cli::Cli;
use crate::output::report::ReportDelimiter;
use crate::scanner::WalkerConfig;
use crate::size::{parse_size, SizeError, SizeUnit};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPEWALK_";

/// Default report file name.
pub const DEFAULT_REPORT: &str = "DupewalkReport.csv";

/// Errors from loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file given with `--config` does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a value of the wrong type.
    #[error("invalid configuration: {0}")]
    Invalid(#[source] Box<figment::Error>),

    /// The size threshold is malformed.
    #[error(transparent)]
    Size(#[from] SizeError),

    /// The configuration could not be rendered as TOML.
    #[error("cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A single search root (kept for simple config files).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Search roots, walked in order after `path`.
    pub paths: Vec<PathBuf>,
    /// Size threshold expression; no unit means megabytes.
    #[serde(deserialize_with = "size_expression")]
    pub size: String,
    /// Glob matched against full paths.
    pub pattern: String,
    /// Report location.
    pub report: PathBuf,
    /// Report field delimiter.
    pub delimiter: ReportDelimiter,
    /// Delete every duplicate without asking.
    pub delete: bool,
    /// Ask before each deletion.
    pub interactive: bool,
    /// Log instead of deleting.
    pub dry_run: bool,
    /// Move to trash instead of deleting permanently.
    pub trash: bool,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
}

/// Accept `size = "10MB"` as well as a bare `size = 10`.
fn size_expression<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Expression {
        Text(String),
        Number(u64),
    }

    Ok(match Expression::deserialize(deserializer)? {
        Expression::Text(text) => text,
        Expression::Number(n) => n.to_string(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            paths: Vec::new(),
            size: "1MB".to_string(),
            pattern: "*".to_string(),
            report: PathBuf::from(DEFAULT_REPORT),
            delimiter: ReportDelimiter::Tab,
            delete: false,
            interactive: false,
            dry_run: false,
            trash: false,
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupewalk").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, then `file` (if any), then `DUPEWALK_*` variables.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the layered configuration.
    ///
    /// An explicit file must exist. Without one, the platform default path
    /// is used only if a file is there.
    ///
    /// # Returns
    ///
    /// The configuration and the file that was merged, if any.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `explicit` does not exist
    /// - `Invalid` if any layer fails to parse
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(ref path) = source {
            log::debug!("Loading config from {}", path.display());
        }

        let config = Self::figment(source.as_deref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))?;
        Ok((config, source))
    }

    /// Apply command-line flags on top of the loaded layers.
    ///
    /// Paths given on the command line replace both `path` and `paths`.
    /// Boolean flags can only switch an option on.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if !cli.paths.is_empty() {
            self.path = None;
            self.paths.clone_from(&cli.paths);
        }
        if let Some(ref size) = cli.size {
            self.size.clone_from(size);
        }
        if let Some(ref pattern) = cli.pattern {
            self.pattern.clone_from(pattern);
        }
        if let Some(ref report) = cli.report {
            self.report.clone_from(report);
        }
        if let Some(delimiter) = cli.delimiter {
            self.delimiter = delimiter;
        }
        if cli.interactive {
            self.interactive = true;
            self.delete = false;
        }
        if cli.delete {
            self.delete = true;
            self.interactive = false;
        }
        self.dry_run |= cli.dry_run;
        self.trash |= cli.trash;
        self.follow_symlinks |= cli.follow_symlinks;
    }

    /// Search roots in order: `path` first, then `paths`.
    #[must_use]
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.path
            .iter()
            .chain(self.paths.iter())
            .cloned()
            .collect()
    }

    /// The size threshold in bytes.
    ///
    /// # Errors
    ///
    /// Returns `SizeError` for a malformed expression.
    pub fn min_size(&self) -> Result<u64, SizeError> {
        parse_size(&self.size, SizeUnit::Megabytes)
    }

    /// Walker settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `SizeError` for a malformed size expression.
    pub fn walker_config(&self) -> Result<WalkerConfig, SizeError> {
        Ok(WalkerConfig::new(
            self.follow_symlinks,
            self.min_size()?,
            Some(self.pattern.clone()),
        ))
    }

    /// Deletion settings derived from this configuration.
    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        let base = if self.trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        };
        base.with_dry_run(self.dry_run)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Render` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
