//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge serves tags, pull requests, issues, and commit
//! timestamps from memory. It records every call so tests can assert how
//! often the network would have been hit, and it can be configured to fail
//! a specific operation.
//!
//! # Example
//!
//! ```
//! use ghchangelog::core::types::Tag;
//! use ghchangelog::forge::mock::MockForge;
//! use ghchangelog::forge::Forge;
//! use chrono::{TimeZone, Utc};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new()
//!     .with_tag(Tag::new("v1.0.0", "abc"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
//!
//! let tags = forge.list_tags().await.unwrap();
//! assert_eq!(tags[0].name, "v1.0.0");
//!
//! let time = forge.commit_timestamp("abc").await.unwrap();
//! assert_eq!(forge.commit_lookups("abc"), 1);
//! # let _ = time;
//! # });
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Forge, ForgeError};
use crate::core::types::{Issue, PullRequest, Tag};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Tags in "fetch" order.
    tags: Vec<Tag>,
    /// Commit timestamps by SHA.
    commits: HashMap<String, DateTime<Utc>>,
    /// Closed pull requests.
    pull_requests: Vec<PullRequest>,
    /// Label overrides served by `pull_request_labels`.
    pr_labels: HashMap<u64, Vec<String>>,
    /// Closed issues.
    issues: Vec<Issue>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_tags with the given error.
    ListTags(ForgeError),
    /// Fail list_closed_pull_requests with the given error.
    ListPullRequests(ForgeError),
    /// Fail pull_request_labels with the given error.
    PullRequestLabels(ForgeError),
    /// Fail list_closed_issues with the given error.
    ListIssues(ForgeError),
    /// Fail commit_timestamp for one SHA with the given error.
    CommitTimestamp { sha: String, error: ForgeError },
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListTags,
    ListPullRequests,
    PullRequestLabels { number: u64 },
    ListIssues,
    CommitTimestamp { sha: String },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Add a tag whose commit has the given timestamp.
    pub fn with_tag(self, tag: Tag, committed_at: DateTime<Utc>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.commits.insert(tag.commit_sha.clone(), committed_at);
            inner.tags.push(tag);
        }
        self
    }

    /// Add a tag whose commit is unknown to the forge.
    pub fn with_dangling_tag(self, tag: Tag) -> Self {
        self.inner.lock().unwrap().tags.push(tag);
        self
    }

    /// Add a closed pull request.
    pub fn with_pull_request(self, pr: PullRequest) -> Self {
        self.inner.lock().unwrap().pull_requests.push(pr);
        self
    }

    /// Serve `labels` from `pull_request_labels(number)`.
    ///
    /// Without an override the PR's own labels are served.
    pub fn with_pr_labels(self, number: u64, labels: Vec<String>) -> Self {
        self.inner.lock().unwrap().pr_labels.insert(number, labels);
        self
    }

    /// Add a closed issue.
    pub fn with_issue(self, issue: Issue) -> Self {
        self.inner.lock().unwrap().issues.push(issue);
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use ghchangelog::forge::mock::{MockForge, FailOn};
    /// use ghchangelog::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::ListTags(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(fail_on);
        self
    }

    /// Get all tags without recording an operation (for test setup).
    pub fn list_tags_sync(&self) -> Vec<Tag> {
        self.inner.lock().unwrap().tags.clone()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Number of `commit_timestamp` calls made for `sha`.
    pub fn commit_lookups(&self, sha: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::CommitTimestamp { sha: s } if s == sha))
            .count()
    }

    /// Number of `commit_timestamp` calls made in total.
    pub fn total_commit_lookups(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::CommitTimestamp { .. }))
            .count()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, op: &MockOperation) -> Option<ForgeError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, op) {
            (Some(FailOn::ListTags(e)), MockOperation::ListTags) => Some(e.clone()),
            (Some(FailOn::ListPullRequests(e)), MockOperation::ListPullRequests) => {
                Some(e.clone())
            }
            (Some(FailOn::PullRequestLabels(e)), MockOperation::PullRequestLabels { .. }) => {
                Some(e.clone())
            }
            (Some(FailOn::ListIssues(e)), MockOperation::ListIssues) => Some(e.clone()),
            (
                Some(FailOn::CommitTimestamp { sha, error }),
                MockOperation::CommitTimestamp { sha: called },
            ) if sha == called => Some(error.clone()),
            _ => None,
        }
    }

    /// Record `op`, then fail it if configured to.
    fn enter(&self, op: MockOperation) -> Result<(), ForgeError> {
        self.record(op.clone());
        match self.check_fail(&op) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError> {
        self.enter(MockOperation::ListTags)?;
        Ok(self.inner.lock().unwrap().tags.clone())
    }

    async fn list_closed_pull_requests(&self) -> Result<Vec<PullRequest>, ForgeError> {
        self.enter(MockOperation::ListPullRequests)?;
        Ok(self.inner.lock().unwrap().pull_requests.clone())
    }

    async fn pull_request_labels(&self, number: u64) -> Result<Vec<String>, ForgeError> {
        self.enter(MockOperation::PullRequestLabels { number })?;

        let inner = self.inner.lock().unwrap();
        if let Some(labels) = inner.pr_labels.get(&number) {
            return Ok(labels.clone());
        }
        inner
            .pull_requests
            .iter()
            .find(|pr| pr.number == number)
            .map(|pr| pr.labels.clone())
            .ok_or_else(|| ForgeError::NotFound(format!("PR #{}", number)))
    }

    async fn list_closed_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        self.enter(MockOperation::ListIssues)?;
        Ok(self.inner.lock().unwrap().issues.clone())
    }

    async fn commit_timestamp(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError> {
        self.enter(MockOperation::CommitTimestamp {
            sha: sha.to_string(),
        })?;

        self.inner
            .lock()
            .unwrap()
            .commits
            .get(sha)
            .copied()
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", sha)))
    }
}
