//! core
//!
//! Domain types and the changelog pipeline.
//!
//! # Modules
//!
//! - [`types`] - Tags, pull requests, and issues
//! - [`timeline`] - Memoized tag time resolution and ordering
//! - [`window`] - Half-open time windows and document modes
//! - [`labels`] - Label filtering, classification, and display order
//! - [`render`] - Markdown sections and document assembly
//! - [`generate`] - Orchestration over a forge
//! - [`config`] - Configuration schema, loading, and option resolution
//! - [`errors`] - Error taxonomy
//!
//! # Design Principles
//!
//! - Records are typed once at the forge boundary
//! - Everything after tag resolution is pure and single-threaded
//! - Errors are returned, never acted on, below the CLI

pub mod config;
pub mod errors;
pub mod generate;
pub mod labels;
pub mod render;
pub mod timeline;
pub mod types;
pub mod window;
