//! core::types
//!
//! Typed records for the changelog domain.
//!
//! # Types
//!
//! - [`Tag`] - A named pointer to a commit, used as a release boundary
//! - [`ResolvedTag`] - A tag plus the committer time of the commit it points to
//! - [`PullRequest`] - A closed pull request (merged or not)
//! - [`Issue`] - A closed issue (never a pull request)
//!
//! # Design
//!
//! Records are built once at the forge boundary from raw API responses.
//! Everything downstream (partitioning, classification, rendering) reads
//! these types and never the forge's response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository tag.
///
/// Identity is the tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "v1.2.0")
    pub name: String,
    /// SHA of the commit the tag points to
    pub commit_sha: String,
}

impl Tag {
    /// Create a tag from a name and commit SHA.
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// A tag whose commit timestamp has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    /// The underlying tag
    pub tag: Tag,
    /// Committer time of the tagged commit (UTC)
    pub timestamp: DateTime<Utc>,
}

impl ResolvedTag {
    /// The tag name.
    pub fn name(&self) -> &str {
        &self.tag.name
    }
}

/// A closed pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Merge time; `None` for PRs closed without merging
    pub merged_at: Option<DateTime<Utc>>,
    /// Author login
    pub author_login: String,
    /// Author profile URL
    pub author_url: String,
    /// Web URL of the PR
    pub html_url: String,
    /// Label names in the order the forge reports them
    pub labels: Vec<String>,
}

/// A closed issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Close time
    pub closed_at: Option<DateTime<Utc>>,
    /// Web URL of the issue
    pub html_url: String,
    /// Label names in the order the forge reports them
    pub labels: Vec<String>,
}

/// Records that carry label names.
pub trait Labeled {
    /// Label names, in forge order.
    fn labels(&self) -> &[String];

    /// Whether the record has any label named `name`.
    fn has_label(&self, name: &str) -> bool {
        self.labels().iter().any(|l| l == name)
    }
}

impl Labeled for PullRequest {
    fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Labeled for Issue {
    fn labels(&self) -> &[String] {
        &self.labels
    }
}
