//! git::interface
//!
//! Repository discovery and remote inspection using git2.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: no repository at or above the path
//! - [`GitError::Internal`]: any other git2 failure
//!
//! # Example
//!
//! ```no_run
//! use ghchangelog::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new(".")).unwrap();
//! if let Some((owner, repo)) = git.github_repository().unwrap() {
//!     println!("{owner}/{repo}");
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::forge::github::parse_github_url;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Handle to a local repository.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open the repository containing `path`.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository. Bare repositories are accepted.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the default remote name.
    ///
    /// Prefers "origin", otherwise the first remote, or `None` if there
    /// are no remotes.
    pub fn default_remote(&self) -> Result<Option<String>, GitError> {
        let remotes = self.repo.remotes()?;

        if remotes.iter().flatten().any(|name| name == "origin") {
            return Ok(Some("origin".to_string()));
        }
        Ok(remotes.iter().flatten().next().map(String::from))
    }

    /// Owner and name of the GitHub repository behind the default remote.
    ///
    /// Returns `None` when there is no remote or it isn't a GitHub URL.
    pub fn github_repository(&self) -> Result<Option<(String, String)>, GitError> {
        let Some(remote) = self.default_remote()? else {
            return Ok(None);
        };
        Ok(self
            .remote_url(&remote)?
            .and_then(|url| parse_github_url(&url)))
    }
}
