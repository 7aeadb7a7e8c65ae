//! core::config
//!
//! Configuration loading and option resolution.
//!
//! # Precedence
//!
//! Option values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repository config file
//! 4. CLI flags (passed in as one more [`FileConfig`] layer)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$CHANGELOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghchangelog/config.toml`
//! 3. `~/.ghchangelog/config.toml`
//!
//! # Repo Config Location
//!
//! `.ghchangelog.toml` in the working directory.
//!
//! # Example
//!
//! ```no_run
//! use ghchangelog::core::config::{ChangelogOptions, Config, FileConfig};
//! use ghchangelog::core::window::DocumentMode;
//! use std::path::Path;
//!
//! let loaded = Config::load(Path::new(".")).unwrap();
//! let cli = FileConfig {
//!     user: Some("octocat".into()),
//!     project: Some("hello-world".into()),
//!     ..Default::default()
//! };
//! let options = ChangelogOptions::resolve(
//!     loaded.config.merge(cli),
//!     None,
//!     DocumentMode::FullHistory,
//!     false,
//! )
//! .unwrap();
//! println!("writing {}", options.output.display());
//! ```

pub mod schema;

pub use schema::{validate_date_format, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::render::RenderOptions;
use super::window::DocumentMode;
use crate::forge::github::DEFAULT_API_BASE;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "CHANGELOG_CONFIG";

/// File name of the repository config.
pub const REPO_CONFIG_FILE: &str = ".ghchangelog.toml";

/// Default issue label allow-list.
pub const DEFAULT_LABELS: &[&str] = &["bug", "enhancement"];

/// Default tag date format.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%y";

/// Default pull request bullet prefix.
pub const DEFAULT_MERGE_PREFIX: &str = "*Merged pull-request:* ";

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "CHANGELOG.md";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("repository not specified: pass --user and --project, or run inside a clone of a GitHub repository")]
    MissingRepository,
}

/// Result of loading configuration files.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// Global and repo layers merged (repo wins).
    pub config: FileConfig,
    /// Files that were read, lowest precedence first.
    pub sources: Vec<PathBuf>,
}

/// Configuration file loader.
#[derive(Debug)]
pub struct Config;

impl Config {
    /// Load global and repository config files.
    ///
    /// Missing files are not an error (defaults are used).
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(cwd: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let global = Self::global_config_path();
        Self::load_from(global.as_deref(), cwd)
    }

    /// Load from an explicit global file (if any) plus the repo file in `cwd`.
    pub fn load_from(global: Option<&Path>, cwd: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let mut config = FileConfig::default();
        let mut sources = Vec::new();

        let repo = Self::repo_config_path(cwd);
        for path in global.into_iter().chain(std::iter::once(repo.as_path())) {
            if path.exists() {
                let layer = Self::read_config(path)?;
                layer.validate()?;
                config = config.merge(layer);
                sources.push(path.to_path_buf());
            }
        }

        Ok(ConfigLoadResult { config, sources })
    }

    /// Locate the global config file, if one exists.
    pub fn global_config_path() -> Option<PathBuf> {
        // 1. Check $CHANGELOG_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/ghchangelog/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ghchangelog/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.ghchangelog/config.toml
        dirs::home_dir()
            .map(|home| home.join(".ghchangelog/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path of the repository config for a working directory.
    pub fn repo_config_path(cwd: &Path) -> PathBuf {
        cwd.join(REPO_CONFIG_FILE)
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved options for one changelog run.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangelogOptions {
    /// Repository owner
    pub user: String,
    /// Repository name
    pub project: String,
    /// API token; `None` means anonymous requests
    pub token: Option<String>,
    /// Include the issue list
    pub issues: bool,
    /// Include the pull request list
    pub pulls: bool,
    /// Issue label allow-list
    pub labels: Vec<String>,
    /// Pull request label allow-list; `None` disables PR filtering
    pub pull_request_labels: Option<Vec<String>>,
    /// Keep issues that have no labels
    pub add_issues_without_labels: bool,
    /// Which sections to render
    pub mode: DocumentMode,
    /// strftime-style format for tag dates
    pub date_format: String,
    /// Prefix of each pull request bullet
    pub merge_prefix: String,
    /// Show the author of each pull request
    pub author: bool,
    /// Output file path
    pub output: PathBuf,
    /// Progress logging
    pub verbose: bool,
    /// REST API base URL
    pub api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for ChangelogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangelogOptions")
            .field("user", &self.user)
            .field("project", &self.project)
            .field("has_token", &self.token.is_some())
            .field("issues", &self.issues)
            .field("pulls", &self.pulls)
            .field("labels", &self.labels)
            .field("pull_request_labels", &self.pull_request_labels)
            .field("add_issues_without_labels", &self.add_issues_without_labels)
            .field("mode", &self.mode)
            .field("date_format", &self.date_format)
            .field("merge_prefix", &self.merge_prefix)
            .field("author", &self.author)
            .field("output", &self.output)
            .field("verbose", &self.verbose)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ChangelogOptions {
    /// Apply defaults under the merged layers and validate the result.
    ///
    /// # Errors
    ///
    /// - `MissingRepository` if `user` or `project` is unset
    /// - `InvalidValue` if a layered value is invalid
    pub fn resolve(
        layers: FileConfig,
        token: Option<String>,
        mode: DocumentMode,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        layers.validate()?;

        let (user, project) = match (layers.user, layers.project) {
            (Some(user), Some(project)) => (user, project),
            _ => return Err(ConfigError::MissingRepository),
        };

        Ok(Self {
            user,
            project,
            token,
            issues: layers.issues.unwrap_or(true),
            pulls: layers.pulls.unwrap_or(true),
            labels: layers
                .labels
                .unwrap_or_else(|| DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()),
            pull_request_labels: layers.pull_request_labels,
            add_issues_without_labels: layers.add_issues_without_labels.unwrap_or(true),
            mode,
            date_format: layers
                .date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            merge_prefix: layers
                .merge_prefix
                .unwrap_or_else(|| DEFAULT_MERGE_PREFIX.to_string()),
            author: layers.author.unwrap_or(true),
            output: layers.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            verbose,
            api_base: layers
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Settings the section renderer needs.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            user: self.user.clone(),
            project: self.project.clone(),
            date_format: self.date_format.clone(),
            pulls: self.pulls,
            issues: self.issues,
            author: self.author,
            merge_prefix: self.merge_prefix.clone(),
        }
    }
}
