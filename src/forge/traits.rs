//! forge::traits
//!
//! Forge trait definition for reading release history from a remote host.
//!
//! # Design
//!
//! The `Forge` trait is async because every operation is a network round
//! trip. All methods return `Result` so API failures surface to the caller
//! unchanged; this layer does not retry.
//!
//! Implementations convert raw API payloads into the typed records in
//! [`crate::core::types`] before returning them.
//!
//! # Example
//!
//! ```ignore
//! use ghchangelog::forge::{Forge, ForgeError};
//!
//! async fn newest_tag(forge: &dyn Forge) -> Result<Option<String>, ForgeError> {
//!     let tags = forge.list_tags().await?;
//!     Ok(tags.first().map(|t| t.name.clone()))
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::{Issue, PullRequest, Tag};

/// Errors from forge operations.
///
/// These error types map to common failure modes when talking to
/// hosting services like GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// The Forge trait for reading tags, pull requests, issues, and commits.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; commit timestamps are resolved
/// from several tasks at once.
///
/// # Pagination
///
/// List operations return every page. Callers never see page boundaries.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// List all tags, in the order the forge returns them.
    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError>;

    /// List all closed pull requests, merged or not.
    ///
    /// PRs closed without merging have `merged_at == None`.
    async fn list_closed_pull_requests(&self) -> Result<Vec<PullRequest>, ForgeError>;

    /// Get the label names of a pull request.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the PR doesn't exist
    async fn pull_request_labels(&self, number: u64) -> Result<Vec<String>, ForgeError>;

    /// List all closed issues.
    ///
    /// Pull requests (which the issues API also returns) are excluded.
    async fn list_closed_issues(&self) -> Result<Vec<Issue>, ForgeError>;

    /// Get the committer timestamp of a commit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the commit doesn't exist
    async fn commit_timestamp(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError>;
}
