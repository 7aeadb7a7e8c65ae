//! core::render
//!
//! Markdown rendering of changelog sections and the full document.
//!
//! # Section Layout
//!
//! ```text
//! ## [v1.2.0](https://github.com/owner/repo/tree/v1.2.0)
//! #### 14/03/24
//! - *Merged pull-request:* Add widgets [\#12](https://github.com/owner/repo/pull/12) ([alice](https://github.com/alice))
//!
//! - *Fixed bug:* Crash on start [\#9](https://github.com/owner/repo/issues/9)
//!
//! ```
//!
//! Pull requests appear in input order. Issues appear in display order
//! (see [`labels::sort_for_display`](super::labels::sort_for_display)).

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::labels::{sort_for_display, IssueKind};
use super::types::{Issue, PullRequest};

/// Document heading.
pub const DOCUMENT_HEADER: &str = "# Changelog\n\n";

/// Attribution line closing every document.
pub const DOCUMENT_FOOTER: &str =
    "\n\n\\* *This changelog was automatically generated by ghchangelog*\n";

/// Date format used when a configured one can't be rendered.
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Characters escaped with a backslash in titles.
const ESCAPED_CHARS: &[char] = &['>', '*', '_', '(', ')', '[', ']', '#'];

/// Rendering settings for sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Repository owner (for tag links)
    pub user: String,
    /// Repository name (for tag links)
    pub project: String,
    /// strftime-style format for the tag date line
    pub date_format: String,
    /// Include the pull request list
    pub pulls: bool,
    /// Include the issue list
    pub issues: bool,
    /// Append the author link to each pull request
    pub author: bool,
    /// Prefix of each pull request bullet
    pub merge_prefix: String,
}

/// Escape markdown control characters in a title.
///
/// # Example
///
/// ```
/// use ghchangelog::core::render::escape_markdown;
///
/// assert_eq!(escape_markdown("Fix [x] in *bold*"), r"Fix \[x\] in \*bold\*");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' {
            escaped.push_str("\\\\");
        } else {
            if ESCAPED_CHARS.contains(&c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
    }
    escaped
}

/// Format a tag time, in UTC.
fn format_date(time: DateTime<Utc>, format: &str) -> String {
    let mut date = String::new();
    if write!(date, "{}", time.format(format)).is_err() {
        date = time.format(FALLBACK_DATE_FORMAT).to_string();
    }
    date
}

/// Render one pull request bullet (with its trailing blank line).
pub fn render_pull_request(pr: &PullRequest, opts: &RenderOptions) -> String {
    let mut line = format!(
        "- {}{} [\\#{}]({})",
        opts.merge_prefix,
        escape_markdown(&pr.title),
        pr.number,
        pr.html_url
    );
    if opts.author {
        let _ = write!(line, " ([{}]({}))", pr.author_login, pr.author_url);
    }
    line.push_str("\n\n");
    line
}

/// Render one issue bullet (with its trailing blank line).
pub fn render_issue(issue: &Issue) -> String {
    format!(
        "- *{}:* {} [\\#{}]({})\n\n",
        IssueKind::of(issue).phrase(),
        escape_markdown(&issue.title),
        issue.number,
        issue.html_url
    )
}

/// Render the section for one tag.
///
/// `issues` is re-ordered for display; `pull_requests` is not.
pub fn render_section(
    pull_requests: &[&PullRequest],
    issues: &[&Issue],
    tag_name: &str,
    tag_time: DateTime<Utc>,
    opts: &RenderOptions,
) -> String {
    let mut section = format!(
        "## [{tag}](https://github.com/{}/{}/tree/{tag})\n",
        opts.user,
        opts.project,
        tag = tag_name
    );
    let _ = writeln!(section, "#### {}", format_date(tag_time, &opts.date_format));

    if opts.pulls {
        for pr in pull_requests {
            section.push_str(&render_pull_request(pr, opts));
        }
    }

    if opts.issues {
        let mut ordered: Vec<&Issue> = issues.to_vec();
        sort_for_display(&mut ordered);
        for issue in ordered {
            section.push_str(&render_issue(issue));
        }
    }

    section
}

/// Assemble sections under the document heading and footer.
pub fn render_document(sections: &[String]) -> String {
    let mut document = String::from(DOCUMENT_HEADER);
    for section in sections {
        document.push_str(section);
    }
    document.push_str(DOCUMENT_FOOTER);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn opts() -> RenderOptions {
        RenderOptions {
            user: "octo".into(),
            project: "widgets".into(),
            date_format: "%d/%m/%y".into(),
            pulls: true,
            issues: true,
            author: true,
            merge_prefix: "*Merged pull-request:* ".into(),
        }
    }

    fn tag_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 23, 30, 0).unwrap()
    }

    fn pr(number: u64, title: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.into(),
            merged_at: Some(tag_time()),
            author_login: "alice".into(),
            author_url: "https://github.com/alice".into(),
            html_url: format!("https://github.com/octo/widgets/pull/{number}"),
            labels: vec![],
        }
    }

    fn issue(number: u64, title: &str, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: title.into(),
            closed_at: Some(tag_time()),
            html_url: format!("https://github.com/octo/widgets/issues/{number}"),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn escape_all_special_characters() {
        assert_eq!(
            escape_markdown(r"a\b>c*d_e(f)g[h]i#j"),
            r"a\\b\>c\*d\_e\(f\)g\[h\]i\#j"
        );
        assert_eq!(escape_markdown("plain title"), "plain title");
    }

    #[test]
    fn pull_request_with_author() {
        assert_eq!(
            render_pull_request(&pr(12, "Add widgets"), &opts()),
            "- *Merged pull-request:* Add widgets [\\#12](https://github.com/octo/widgets/pull/12) ([alice](https://github.com/alice))\n\n"
        );
    }

    #[test]
    fn pull_request_without_author() {
        let opts = RenderOptions {
            author: false,
            merge_prefix: String::new(),
            ..opts()
        };
        assert_eq!(
            render_pull_request(&pr(3, "Fix_it"), &opts),
            "- Fix\\_it [\\#3](https://github.com/octo/widgets/pull/3)\n\n"
        );
    }

    #[test]
    fn issue_prefixes() {
        assert_eq!(
            render_issue(&issue(9, "Crash", &["enhancement", "bug"])),
            "- *Fixed bug:* Crash [\\#9](https://github.com/octo/widgets/issues/9)\n\n"
        );
        assert_eq!(
            render_issue(&issue(10, "Dark mode", &["enhancement"])),
            "- *Implemented enhancement:* Dark mode [\\#10](https://github.com/octo/widgets/issues/10)\n\n"
        );
        assert_eq!(
            render_issue(&issue(11, "Typo", &[])),
            "- *Closed issue:* Typo [\\#11](https://github.com/octo/widgets/issues/11)\n\n"
        );
    }

    #[test]
    fn section_layout() {
        let prs = [pr(12, "Add widgets")];
        let issues = [issue(9, "Crash", &["bug"])];
        let section = render_section(
            &prs.iter().collect::<Vec<_>>(),
            &issues.iter().collect::<Vec<_>>(),
            "v1.2.0",
            tag_time(),
            &opts(),
        );

        assert_eq!(
            section,
            "## [v1.2.0](https://github.com/octo/widgets/tree/v1.2.0)\n\
             #### 14/03/24\n\
             - *Merged pull-request:* Add widgets [\\#12](https://github.com/octo/widgets/pull/12) ([alice](https://github.com/alice))\n\n\
             - *Fixed bug:* Crash [\\#9](https://github.com/octo/widgets/issues/9)\n\n"
        );
    }

    #[test]
    fn section_orders_issues_for_display() {
        let issues = [
            issue(1, "Unlabeled", &[]),
            issue(2, "Apple", &["apple"]),
            issue(3, "Zebra", &["zebra"]),
        ];
        let section = render_section(
            &[],
            &issues.iter().collect::<Vec<_>>(),
            "v1",
            tag_time(),
            &opts(),
        );

        let zebra = section.find("Zebra").unwrap();
        let apple = section.find("Apple").unwrap();
        let unlabeled = section.find("Unlabeled").unwrap();
        assert!(zebra < apple && apple < unlabeled);
    }

    #[test]
    fn section_respects_toggles() {
        let prs = [pr(12, "Add widgets")];
        let issues = [issue(9, "Crash", &["bug"])];
        let opts = RenderOptions {
            pulls: false,
            issues: false,
            ..opts()
        };
        let section = render_section(
            &prs.iter().collect::<Vec<_>>(),
            &issues.iter().collect::<Vec<_>>(),
            "v1",
            tag_time(),
            &opts,
        );
        assert_eq!(
            section,
            "## [v1](https://github.com/octo/widgets/tree/v1)\n#### 14/03/24\n"
        );
    }

    #[test]
    fn date_is_formatted_in_utc() {
        let opts = RenderOptions {
            date_format: "%Y-%m-%d %H:%M".into(),
            ..opts()
        };
        let section = render_section(&[], &[], "v1", tag_time(), &opts);
        assert!(section.contains("#### 2024-03-14 23:30\n"));
    }

    #[test]
    fn invalid_date_format_falls_back() {
        assert_eq!(format_date(tag_time(), "%Q"), "2024-03-14");
    }

    #[test]
    fn document_wraps_sections() {
        let document = render_document(&["## a\n".to_string(), "## b\n".to_string()]);
        assert_eq!(
            document,
            "# Changelog\n\n## a\n## b\n\n\n\\* *This changelog was automatically generated by ghchangelog*\n"
        );
    }
}
