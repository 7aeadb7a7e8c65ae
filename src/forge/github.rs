//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. Every list endpoint
//! is paginated with `per_page=100`; pages are requested until one comes
//! back short.
//!
//! # Authentication
//!
//! A token is optional. Without one, requests go out anonymously and
//! GitHub applies its unauthenticated rate limit.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation:
//! - Returns `ForgeError::RateLimited` when limits are hit
//! - Does not implement automatic retry (caller's responsibility)
//!
//! # Example
//!
//! ```ignore
//! use ghchangelog::forge::github::GitHubForge;
//! use ghchangelog::forge::Forge;
//!
//! let forge = GitHubForge::new(Some("ghp_xxx".into()), "octocat", "hello-world");
//! let prs = forge.list_closed_pull_requests().await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{Forge, ForgeError};
use crate::core::types::{Issue, PullRequest, Tag};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "ghchangelog";

/// GitHub's max page size.
const PER_PAGE: usize = 100;

/// Login used when GitHub reports a deleted ("ghost") author.
const GHOST_LOGIN: &str = "ghost";

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// API token (anonymous requests when absent)
    token: Option<String>,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &self.token.is_some())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a GitHub forge against `api.github.com`.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token, or `None` for anonymous access
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    pub fn new(token: Option<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations
    /// (e.g., `https://github.example.com/api/v3`).
    pub fn with_api_base(
        token: Option<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token,
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// GET a single JSON document.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ForgeError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        self.handle_response(response).await
    }

    /// GET every page of a list endpoint.
    ///
    /// `path` is relative to the repository and may carry its own query.
    async fn get_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ForgeError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items: Vec<T> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}{}per_page={}&page={}",
                self.repo_url(path),
                separator,
                PER_PAGE,
                page
            );

            let page_items: Vec<T> = self.get_json(&url).await?;
            let page_count = page_items.len();
            items.extend(page_items);

            if page_count < PER_PAGE {
                break;
            }

            page += 1;
        }

        Ok(items)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // GitHub signals an exhausted quota with 403 plus a zero remaining count
        let quota_exhausted = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false);

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::FORBIDDEN if quota_exhausted => ForgeError::RateLimited,
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ForgeError> {
        let tags: Vec<GitHubTag> = self.get_all_pages("tags").await?;
        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn list_closed_pull_requests(&self) -> Result<Vec<PullRequest>, ForgeError> {
        let prs: Vec<GitHubPullRequestListItem> =
            self.get_all_pages("pulls?state=closed").await?;
        Ok(prs.into_iter().map(Into::into).collect())
    }

    async fn pull_request_labels(&self, number: u64) -> Result<Vec<String>, ForgeError> {
        // Labels live on the issue that backs every PR
        let url = self.repo_url(&format!("issues/{}", number));
        let issue: GitHubIssue = self.get_json(&url).await?;
        Ok(issue.labels.into_iter().map(|l| l.name).collect())
    }

    async fn list_closed_issues(&self) -> Result<Vec<Issue>, ForgeError> {
        let issues: Vec<GitHubIssue> = self
            .get_all_pages("issues?state=closed&filter=all")
            .await?;

        Ok(issues
            .into_iter()
            .filter(|i| i.pull_request.is_none())
            .map(Into::into)
            .collect())
    }

    async fn commit_timestamp(&self, sha: &str) -> Result<DateTime<Utc>, ForgeError> {
        let url = self.repo_url(&format!("git/commits/{}", sha));
        let commit: GitHubGitCommit = self.get_json(&url).await?;
        Ok(commit.committer.date)
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub tag list item.
#[derive(Deserialize)]
struct GitHubTag {
    name: String,
    commit: GitHubCommitRef,
}

/// Commit reference inside a tag list item.
#[derive(Deserialize)]
struct GitHubCommitRef {
    sha: String,
}

/// GitHub PR list item (subset of fields used for changelogs).
#[derive(Deserialize)]
struct GitHubPullRequestListItem {
    number: u64,
    title: String,
    merged_at: Option<DateTime<Utc>>,
    /// None for deleted accounts
    user: Option<GitHubUser>,
    html_url: String,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
}

/// Minimal GitHub user info.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
    html_url: String,
}

/// GitHub label.
#[derive(Deserialize)]
struct GitHubLabel {
    name: String,
}

/// GitHub issue (also returned for PRs, with a `pull_request` marker).
#[derive(Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
    closed_at: Option<DateTime<Utc>>,
    html_url: String,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    pull_request: Option<serde_json::Value>,
}

/// Git data commit.
#[derive(Deserialize)]
struct GitHubGitCommit {
    committer: GitHubSignature,
}

/// Author/committer signature on a git data commit.
#[derive(Deserialize)]
struct GitHubSignature {
    date: DateTime<Utc>,
}

impl From<GitHubTag> for Tag {
    fn from(gh: GitHubTag) -> Self {
        Tag {
            name: gh.name,
            commit_sha: gh.commit.sha,
        }
    }
}

impl From<GitHubPullRequestListItem> for PullRequest {
    fn from(gh: GitHubPullRequestListItem) -> Self {
        let (author_login, author_url) = match gh.user {
            Some(user) => (user.login, user.html_url),
            None => (
                GHOST_LOGIN.to_string(),
                format!("https://github.com/{}", GHOST_LOGIN),
            ),
        };

        PullRequest {
            number: gh.number,
            title: gh.title,
            merged_at: gh.merged_at,
            author_login,
            author_url,
            html_url: gh.html_url,
            labels: gh.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

impl From<GitHubIssue> for Issue {
    fn from(gh: GitHubIssue) -> Self {
        Issue {
            number: gh.number,
            title: gh.title,
            closed_at: gh.closed_at,
            html_url: gh.html_url,
            labels: gh.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

// --------------------------------------------------------------------------
// URL Parsing
// --------------------------------------------------------------------------

/// Parse a GitHub remote URL to extract owner and repo.
///
/// Supports both SSH and HTTPS formats:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo`
///
/// # Example
///
/// ```
/// use ghchangelog::forge::github::parse_github_url;
///
/// let (owner, repo) = parse_github_url("git@github.com:octocat/hello-world.git").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    // SSH format: git@github.com:owner/repo.git
    if let Some(rest) = url.strip_prefix("git@github.com:") {
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        let parts: Vec<&str> = rest.splitn(2, '/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            return Some((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // HTTPS format: https://github.com/owner/repo.git
    if let Some(rest) = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
    {
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        let parts: Vec<&str> = rest.splitn(2, '/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            return Some((parts[0].to_string(), parts[1].to_string()));
        }
    }

    None
}
