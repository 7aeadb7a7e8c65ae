//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Every flag that has a config file counterpart is optional here, so an
//! absent flag falls through to the config layers. Boolean settings come in
//! `--x` / `--no-x` pairs; the last one given wins.

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::FileConfig;
use crate::core::window::DocumentMode;
use crate::ui::output::Verbosity;

/// Generate a markdown changelog from a GitHub repository's tags, merged
/// pull requests, and closed issues.
#[derive(Parser, Debug)]
#[command(name = "ghchangelog")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Full history for the repository behind `origin`
    ghchangelog

    # Only the changes since the previous tag
    ghchangelog --last

    # Changes between two named tags, into a custom file
    ghchangelog -u octocat -p hello-world --between v1.0 v0.9 -o RELEASE.md")]
pub struct Cli {
    /// Repository owner (detected from the origin remote if omitted)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Repository name (detected from the origin remote if omitted)
    #[arg(short, long)]
    pub project: Option<String>,

    /// GitHub API token (falls back to $CHANGELOG_GITHUB_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Date format for tag dates (strftime syntax, default "%d/%m/%y")
    #[arg(short = 'f', long)]
    pub date_format: Option<String>,

    /// Output file (default CHANGELOG.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include closed issues
    #[arg(long, overrides_with = "no_issues")]
    pub issues: bool,

    /// Leave out closed issues
    #[arg(long, overrides_with = "issues")]
    pub no_issues: bool,

    /// Include merged pull requests
    #[arg(long, overrides_with = "no_pull_requests")]
    pub pull_requests: bool,

    /// Leave out merged pull requests
    #[arg(long, overrides_with = "pull_requests")]
    pub no_pull_requests: bool,

    /// Credit the author of each pull request
    #[arg(long, overrides_with = "no_author")]
    pub author: bool,

    /// Don't credit pull request authors
    #[arg(long, overrides_with = "author")]
    pub no_author: bool,

    /// Include issues that have no labels
    #[arg(long, overrides_with = "no_issues_wo_labels")]
    pub issues_wo_labels: bool,

    /// Leave out issues that have no labels
    #[arg(long, overrides_with = "issues_wo_labels")]
    pub no_issues_wo_labels: bool,

    /// Issue labels to include (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "LABELS")]
    pub labels: Option<Vec<String>>,

    /// Only include pull requests with these labels, or with none (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "LABELS")]
    pub pr_labels: Option<Vec<String>>,

    /// Prefix of each pull request entry
    #[arg(long, value_name = "PREFIX")]
    pub merge_prefix: Option<String>,

    /// Only the changes between the two most recent tags
    #[arg(long, conflicts_with = "between")]
    pub last: bool,

    /// Only the changes between two named tags
    #[arg(long, num_args = 2, value_names = ["TAG1", "TAG2"])]
    pub between: Option<Vec<String>>,

    /// GitHub REST API base URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Log progress
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Collapse a `--x` / `--no-x` pair into an optional setting.
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Settings given on the command line, as the topmost config layer.
    pub fn to_file_config(&self) -> FileConfig {
        FileConfig {
            user: self.user.clone(),
            project: self.project.clone(),
            issues: flag_pair(self.issues, self.no_issues),
            pulls: flag_pair(self.pull_requests, self.no_pull_requests),
            labels: self.labels.clone(),
            pull_request_labels: self.pr_labels.clone(),
            add_issues_without_labels: flag_pair(self.issues_wo_labels, self.no_issues_wo_labels),
            date_format: self.date_format.clone(),
            merge_prefix: self.merge_prefix.clone(),
            author: flag_pair(self.author, self.no_author),
            output: self.output.clone(),
            api_base: self.api_base.clone(),
        }
    }

    /// Document mode selected by `--last` / `--between`.
    pub fn mode(&self) -> DocumentMode {
        match self.between.as_deref() {
            Some([tag1, tag2]) => DocumentMode::Range {
                tag1: tag1.clone(),
                tag2: tag2.clone(),
            },
            _ if self.last => DocumentMode::LastTwo,
            _ => DocumentMode::FullHistory,
        }
    }

    /// Output verbosity from `--quiet` / `--verbose`.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
