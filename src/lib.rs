//! ghchangelog - Generate a markdown changelog from a GitHub repository
//!
//! The changelog has one section per release tag. Each section lists the
//! pull requests merged and the issues closed since the previous tag.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface (parses args, runs generation, writes the file)
//! - [`core`] - Domain types, tag timeline, windows, labels, rendering, config
//! - [`forge`] - The GitHub data source behind an async trait, plus a mock
//! - [`git`] - Repository detection from the local remote
//! - [`ui`] - Console output
//!
//! # Correctness Invariants
//!
//! 1. Each tag's commit time is fetched at most once per run
//! 2. Windows are half-open, so no item lands in two sections
//! 3. Nothing is written unless the whole document was generated

pub mod cli;
pub mod core;
pub mod forge;
pub mod git;
pub mod ui;
