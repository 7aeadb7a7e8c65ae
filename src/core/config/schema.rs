//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Locations
//!
//! Global (first match wins):
//! 1. `$CHANGELOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghchangelog/config.toml`
//! 3. `~/.ghchangelog/config.toml`
//!
//! Repository: `.ghchangelog.toml` in the working directory.
//!
//! # Validation
//!
//! Values are validated after parsing and after layering, so a bad value
//! from any source is reported before the first network call.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One layer of changelog settings.
///
/// Every key is optional; absent keys fall through to the layer below.
/// The API token is deliberately not a file setting.
///
/// # Example
///
/// ```toml
/// user = "octocat"
/// project = "hello-world"
/// labels = ["bug", "enhancement", "security"]
/// add_issues_without_labels = false
/// date_format = "%Y-%m-%d"
/// author = false
/// output = "docs/CHANGELOG.md"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Repository owner
    pub user: Option<String>,

    /// Repository name
    pub project: Option<String>,

    /// Include the issue list
    pub issues: Option<bool>,

    /// Include the pull request list
    pub pulls: Option<bool>,

    /// Issue label allow-list
    pub labels: Option<Vec<String>>,

    /// Pull request label allow-list
    pub pull_request_labels: Option<Vec<String>>,

    /// Keep issues that have no labels
    pub add_issues_without_labels: Option<bool>,

    /// strftime-style format for tag dates
    pub date_format: Option<String>,

    /// Prefix of each pull request bullet
    pub merge_prefix: Option<String>,

    /// Show the author of each pull request
    pub author: Option<bool>,

    /// Output file path
    pub output: Option<PathBuf>,

    /// REST API base URL (GitHub Enterprise)
    pub api_base: Option<String>,
}

impl FileConfig {
    /// Layer `over` on top of `self`; keys set in `over` win.
    pub fn merge(self, over: FileConfig) -> FileConfig {
        FileConfig {
            user: over.user.or(self.user),
            project: over.project.or(self.project),
            issues: over.issues.or(self.issues),
            pulls: over.pulls.or(self.pulls),
            labels: over.labels.or(self.labels),
            pull_request_labels: over.pull_request_labels.or(self.pull_request_labels),
            add_issues_without_labels: over
                .add_issues_without_labels
                .or(self.add_issues_without_labels),
            date_format: over.date_format.or(self.date_format),
            merge_prefix: over.merge_prefix.or(self.merge_prefix),
            author: over.author.or(self.author),
            output: over.output.or(self.output),
            api_base: over.api_base.or(self.api_base),
        }
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("user", &self.user), ("project", &self.project)] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
                }
            }
        }

        if let Some(format) = &self.date_format {
            validate_date_format(format)?;
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base must be an http(s) URL, got '{}'",
                    api_base
                )));
            }
        }

        if let Some(output) = &self.output {
            if output.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue("output cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Check that a strftime-style format only uses known specifiers.
pub fn validate_date_format(format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue(format!(
            "invalid date format '{}'",
            format
        )));
    }
    Ok(())
}
