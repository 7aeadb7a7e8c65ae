//! git
//!
//! Local repository access.
//!
//! This module is the only place that imports `git2`. It is used to detect
//! the target repository from the working directory's remote when `user`
//! and `project` are not configured.

mod interface;

pub use interface::{Git, GitError};
