//! core::errors
//!
//! Error taxonomy for changelog generation.
//!
//! Every variant is fatal to the run. Generation either assembles the full
//! document or returns one of these before anything is written.

use thiserror::Error;

use crate::forge::ForgeError;

/// Errors from changelog generation.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The commit timestamp for a tag could not be fetched.
    #[error("failed to look up commit {sha} for tag '{tag}': {source}")]
    Lookup {
        /// Tag whose commit was being resolved
        tag: String,
        /// Commit SHA the tag points to
        sha: String,
        /// Underlying forge failure
        source: ForgeError,
    },

    /// A tag named on the command line does not exist.
    #[error("can't find tag '{0}'")]
    UnknownTag(String),

    /// The repository has no tags to build windows from.
    #[error("repository has no tags")]
    NoTags,

    /// Fetching tags, pull requests, or issues failed.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// A timestamp resolution task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = ChangelogError::Lookup {
            tag: "v1.0".into(),
            sha: "abc".into(),
            source: ForgeError::NotFound("commit abc".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to look up commit abc for tag 'v1.0': not found: commit abc"
        );

        assert_eq!(
            ChangelogError::UnknownTag("v9".into()).to_string(),
            "can't find tag 'v9'"
        );
        assert_eq!(ChangelogError::NoTags.to_string(), "repository has no tags");
        assert_eq!(
            ChangelogError::from(ForgeError::RateLimited).to_string(),
            "rate limited"
        );
    }
}
