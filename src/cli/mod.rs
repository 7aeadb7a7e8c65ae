//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse arguments and layer them over the config files
//! - Detect the repository and discover the API token
//! - Run generation on a tokio runtime
//! - Write the document and report the result
//!
//! # Architecture
//!
//! The CLI layer is thin. Generation lives in [`crate::core::generate`] and
//! returns errors instead of exiting; only `main` turns an error into a
//! non-zero exit status.

pub mod args;
pub mod auth;
pub mod completion;

pub use args::{Cli, Shell};

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::config::{ChangelogOptions, Config, FileConfig};
use crate::core::generate::Generator;
use crate::forge::github::GitHubForge;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(shell) = cli.completions {
        completion::write_completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    let verbosity = cli.verbosity();
    let cwd = std::env::current_dir().context("Failed to read working directory")?;

    let loaded = Config::load(&cwd).context("Failed to load configuration")?;
    for source in &loaded.sources {
        output::debug(format!("loaded config from {}", source.display()), verbosity);
    }

    let mut layers = loaded.config.merge(cli.to_file_config());
    if layers.user.is_none() || layers.project.is_none() {
        detect_repository(&cwd, &mut layers, verbosity);
    }

    let token = match auth::discover_token_from_env(cli.token.clone()) {
        Ok(token) => Some(token),
        Err(warning) => {
            output::warn(warning, verbosity);
            None
        }
    };

    let options = ChangelogOptions::resolve(
        layers,
        token,
        cli.mode(),
        verbosity == Verbosity::Debug,
    )?;
    output::debug(format!("performing task with options {:?}", options), verbosity);

    let forge = GitHubForge::with_api_base(
        options.token.clone(),
        &options.user,
        &options.project,
        &options.api_base,
    );
    let output_path = options.output.clone();
    let generator = Generator::new(Arc::new(forge), options, verbosity);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let document = runtime
        .block_on(generator.generate())
        .context("Failed to generate changelog")?;

    output::write_atomic(&output_path, &document)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    output::success(
        format!("Done! Generated changelog in {}", output_path.display()),
        verbosity,
    );
    Ok(())
}

/// Fill in a missing `user`/`project` from the working directory's remote.
///
/// Values already set are kept. Detection failures are not errors here;
/// option resolution reports the missing repository.
fn detect_repository(cwd: &Path, layers: &mut FileConfig, verbosity: Verbosity) {
    match Git::open(cwd).and_then(|git| git.github_repository()) {
        Ok(Some((owner, repo))) => {
            output::debug(format!("detected repository {}/{}", owner, repo), verbosity);
            layers.user.get_or_insert(owner);
            layers.project.get_or_insert(repo);
        }
        Ok(None) => output::debug("no GitHub remote found", verbosity),
        Err(e) => output::debug(format!("repository detection skipped: {}", e), verbosity),
    }
}
