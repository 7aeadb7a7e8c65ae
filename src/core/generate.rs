//! core::generate
//!
//! Changelog generation: fetch, filter, resolve, plan, render.
//!
//! # Lifecycle
//!
//! 1. Fetch tags (an empty list is an error)
//! 2. Fetch closed pull requests and apply the PR allow-list
//! 3. Fetch closed issues and apply the issue allow-list
//! 4. Resolve and sort tags newest first
//! 5. Plan windows for the document mode
//! 6. Render one section per window and assemble the document
//!
//! Nothing is written here. Any error aborts before a document exists, so
//! callers never see partial output.

use std::sync::Arc;

use super::config::ChangelogOptions;
use super::errors::ChangelogError;
use super::labels::{filter_issues, filter_pull_requests};
use super::render::{render_document, render_section, RenderOptions};
use super::timeline::TagTimeline;
use super::types::{Issue, PullRequest};
use super::window::{plan_windows, Window};
use crate::forge::Forge;
use crate::ui::output::{self, Verbosity};

/// Builds a changelog document from a forge.
pub struct Generator {
    forge: Arc<dyn Forge>,
    options: ChangelogOptions,
    verbosity: Verbosity,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("forge", &self.forge.name())
            .field("options", &self.options)
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

impl Generator {
    /// Create a generator.
    pub fn new(forge: Arc<dyn Forge>, options: ChangelogOptions, verbosity: Verbosity) -> Self {
        Self {
            forge,
            options,
            verbosity,
        }
    }

    /// Generate the full changelog document.
    ///
    /// # Errors
    ///
    /// - `NoTags` if the repository has no tags
    /// - `UnknownTag` if a range names a missing tag
    /// - `Lookup` if any tag's commit time can't be fetched
    /// - `Forge` if listing tags, pull requests, or issues fails
    pub async fn generate(&self) -> Result<String, ChangelogError> {
        let tags = self.forge.list_tags().await?;
        output::debug(format!("found {} tags", tags.len()), self.verbosity);
        if tags.is_empty() {
            return Err(ChangelogError::NoTags);
        }

        let pull_requests = self.fetch_pull_requests().await?;
        let issues = self.fetch_issues().await?;

        let timeline = TagTimeline::new(Arc::clone(&self.forge));
        let sorted = timeline.sort_descending(&tags).await?;
        output::debug(
            format!("resolved {} tag times", timeline.cached_count()),
            self.verbosity,
        );

        let windows = plan_windows(&self.options.mode, &sorted)?;
        let render = self.options.render_options();
        let sections: Vec<String> = windows
            .iter()
            .map(|window| self.render_window(window, &pull_requests, &issues, &render))
            .collect();

        output::debug(
            format!("rendered {} sections", sections.len()),
            self.verbosity,
        );
        Ok(render_document(&sections))
    }

    fn render_window(
        &self,
        window: &Window,
        pull_requests: &[PullRequest],
        issues: &[Issue],
        render: &RenderOptions,
    ) -> String {
        let prs = window.select(pull_requests, |pr| pr.merged_at);
        let closed = window.select(issues, |issue| issue.closed_at);

        output::debug(
            format!(
                "{}: {} pull requests, {} issues",
                window.newer_tag,
                prs.len(),
                closed.len()
            ),
            self.verbosity,
        );
        render_section(&prs, &closed, &window.newer_tag, window.newer_bound, render)
    }

    /// Closed pull requests, label-filtered when a PR allow-list is set.
    async fn fetch_pull_requests(&self) -> Result<Vec<PullRequest>, ChangelogError> {
        if !self.options.pulls {
            return Ok(Vec::new());
        }

        let mut prs = self.forge.list_closed_pull_requests().await?;
        output::debug(
            format!("found {} closed pull requests", prs.len()),
            self.verbosity,
        );

        let Some(allow) = &self.options.pull_request_labels else {
            return Ok(prs);
        };

        // Unmerged PRs fall in no window, so skip their label reads.
        prs.retain(|pr| pr.merged_at.is_some());

        // Listing responses can carry stale labels; read them from the issue.
        for pr in &mut prs {
            pr.labels = self.forge.pull_request_labels(pr.number).await?;
        }
        let kept = filter_pull_requests(prs, allow);
        output::debug(
            format!(
                "kept {} pull requests with labels {:?} or no labels",
                kept.len(),
                allow
            ),
            self.verbosity,
        );
        Ok(kept)
    }

    /// Closed issues passing the issue allow-list.
    async fn fetch_issues(&self) -> Result<Vec<Issue>, ChangelogError> {
        if !self.options.issues {
            return Ok(Vec::new());
        }

        let issues = self.forge.list_closed_issues().await?;
        let found = issues.len();
        let kept = filter_issues(
            issues,
            &self.options.labels,
            self.options.add_issues_without_labels,
        );
        output::debug(
            format!(
                "kept {} of {} closed issues with labels {:?}{}",
                kept.len(),
                found,
                self.options.labels,
                if self.options.add_issues_without_labels {
                    " and without labels"
                } else {
                    ""
                }
            ),
            self.verbosity,
        );
        Ok(kept)
    }
}
