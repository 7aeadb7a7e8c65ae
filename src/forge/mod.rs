//! forge
//!
//! Abstraction for the remote host that owns the release history.
//!
//! # Architecture
//!
//! The `Forge` trait defines the read-only interface the changelog
//! generator consumes: tags, closed pull requests, closed issues, and
//! commit timestamps. Generation code depends on the trait only.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and `ForgeError`
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: In-memory implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use ghchangelog::forge::github::GitHubForge;
//! use ghchangelog::forge::Forge;
//!
//! let forge = GitHubForge::new(Some(token), "octocat", "hello-world");
//! let tags = forge.list_tags().await?;
//! println!("{} tags", tags.len());
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
