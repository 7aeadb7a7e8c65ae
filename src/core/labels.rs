//! core::labels
//!
//! Label-based filtering, classification, and display ordering.
//!
//! # Filtering
//!
//! - Pull requests (only when a PR allow-list is configured): kept if any
//!   label is in the allow-list, or if they have no labels at all.
//! - Issues: kept if any label is in the allow-list; unlabeled issues are
//!   kept only when explicitly requested.
//!
//! # Classification
//!
//! Each issue gets exactly one [`IssueKind`]. `bug` beats `enhancement`,
//! which beats a plain closed issue.
//!
//! # Ordering
//!
//! Issues are displayed labeled-first, by descending first label name, with
//! unlabeled issues last. Issues that compare equal keep their input order.

use std::cmp::Ordering;

use super::types::{Issue, Labeled, PullRequest};

/// Label that marks an issue as a bug.
pub const BUG_LABEL: &str = "bug";

/// Label that marks an issue as an enhancement.
pub const ENHANCEMENT_LABEL: &str = "enhancement";

/// Whether any of `labels` is in `allow`.
fn intersects(labels: &[String], allow: &[String]) -> bool {
    labels.iter().any(|l| allow.contains(l))
}

/// Whether a pull request with `labels` passes the PR allow-list.
pub fn retain_pull_request(labels: &[String], allow: &[String]) -> bool {
    labels.is_empty() || intersects(labels, allow)
}

/// Whether an issue with `labels` passes the issue allow-list.
pub fn retain_issue(labels: &[String], allow: &[String], include_unlabeled: bool) -> bool {
    intersects(labels, allow) || (include_unlabeled && labels.is_empty())
}

/// Keep the pull requests that pass the PR allow-list.
pub fn filter_pull_requests(prs: Vec<PullRequest>, allow: &[String]) -> Vec<PullRequest> {
    prs.into_iter()
        .filter(|pr| retain_pull_request(&pr.labels, allow))
        .collect()
}

/// Keep the issues that pass the issue allow-list.
pub fn filter_issues(issues: Vec<Issue>, allow: &[String], include_unlabeled: bool) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| retain_issue(&issue.labels, allow, include_unlabeled))
        .collect()
}

/// Display category of a closed issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Labeled `bug`
    Bug,
    /// Labeled `enhancement` (and not `bug`)
    Enhancement,
    /// Anything else
    Closed,
}

impl IssueKind {
    /// Classify an issue by its labels.
    pub fn of(issue: &impl Labeled) -> Self {
        if issue.has_label(BUG_LABEL) {
            IssueKind::Bug
        } else if issue.has_label(ENHANCEMENT_LABEL) {
            IssueKind::Enhancement
        } else {
            IssueKind::Closed
        }
    }

    /// Phrase that prefixes the issue's bullet.
    pub fn phrase(&self) -> &'static str {
        match self {
            IssueKind::Bug => "Fixed bug",
            IssueKind::Enhancement => "Implemented enhancement",
            IssueKind::Closed => "Closed issue",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

/// Display order of two labeled records.
///
/// Labeled before unlabeled; among labeled, descending by first label.
pub fn compare_for_display<T: Labeled>(a: &T, b: &T) -> Ordering {
    match (a.labels().first(), b.labels().first()) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort records into display order (stable).
pub fn sort_for_display<T: Labeled>(items: &mut [&T]) {
    items.sort_by(|a, b| compare_for_display(*a, *b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn issue(number: u64, names: &[&str]) -> Issue {
        Issue {
            number,
            title: format!("Issue {number}"),
            closed_at: None,
            html_url: format!("https://github.com/o/r/issues/{number}"),
            labels: labels(names),
        }
    }

    fn pr(number: u64, names: &[&str]) -> PullRequest {
        PullRequest {
            number,
            title: format!("PR {number}"),
            merged_at: None,
            author_login: "dev".into(),
            author_url: "https://github.com/dev".into(),
            html_url: format!("https://github.com/o/r/pull/{number}"),
            labels: labels(names),
        }
    }

    mod filtering {
        use super::*;

        #[test]
        fn pull_request_allow_list() {
            let allow = labels(&["backend"]);
            assert!(retain_pull_request(&labels(&["backend", "ui"]), &allow));
            assert!(!retain_pull_request(&labels(&["ui"]), &allow));
            assert!(retain_pull_request(&labels(&[]), &allow));
        }

        #[test]
        fn empty_pr_allow_list_keeps_only_unlabeled() {
            assert!(retain_pull_request(&[], &[]));
            assert!(!retain_pull_request(&labels(&["backend"]), &[]));
        }

        #[test]
        fn filter_pull_requests_preserves_order() {
            let kept = filter_pull_requests(
                vec![pr(1, &["ui"]), pr(2, &[]), pr(3, &["backend"])],
                &labels(&["backend"]),
            );
            let numbers: Vec<_> = kept.iter().map(|p| p.number).collect();
            assert_eq!(numbers, vec![2, 3]);
        }

        #[test]
        fn issue_allow_list() {
            let allow = labels(&["bug", "enhancement"]);
            assert!(retain_issue(&labels(&["bug"]), &allow, false));
            assert!(retain_issue(&labels(&["wontfix", "enhancement"]), &allow, false));
            assert!(!retain_issue(&labels(&["question"]), &allow, true));
        }

        #[test]
        fn unlabeled_issues_need_the_flag() {
            let allow = labels(&["bug"]);
            assert!(!retain_issue(&[], &allow, false));
            assert!(retain_issue(&[], &allow, true));
        }

        #[test]
        fn filter_issues_mixed() {
            let kept = filter_issues(
                vec![issue(1, &["bug"]), issue(2, &[]), issue(3, &["docs"])],
                &labels(&["bug"]),
                true,
            );
            let numbers: Vec<_> = kept.iter().map(|i| i.number).collect();
            assert_eq!(numbers, vec![1, 2]);
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn bug_beats_enhancement() {
            assert_eq!(IssueKind::of(&issue(1, &["enhancement", "bug"])), IssueKind::Bug);
            assert_eq!(IssueKind::of(&issue(1, &["bug", "enhancement"])), IssueKind::Bug);
        }

        #[test]
        fn enhancement() {
            assert_eq!(
                IssueKind::of(&issue(1, &["ui", "enhancement"])),
                IssueKind::Enhancement
            );
        }

        #[test]
        fn everything_else_is_closed() {
            assert_eq!(IssueKind::of(&issue(1, &["question"])), IssueKind::Closed);
            assert_eq!(IssueKind::of(&issue(1, &[])), IssueKind::Closed);
        }

        #[test]
        fn label_match_is_exact() {
            assert_eq!(IssueKind::of(&issue(1, &["Bug"])), IssueKind::Closed);
            assert_eq!(IssueKind::of(&issue(1, &["bugfix"])), IssueKind::Closed);
        }

        #[test]
        fn phrases() {
            assert_eq!(IssueKind::Bug.phrase(), "Fixed bug");
            assert_eq!(IssueKind::Enhancement.phrase(), "Implemented enhancement");
            assert_eq!(IssueKind::Closed.to_string(), "Closed issue");
        }
    }

    mod ordering {
        use super::*;

        fn order(issues: &[Issue]) -> Vec<u64> {
            let mut refs: Vec<&Issue> = issues.iter().collect();
            sort_for_display(&mut refs);
            refs.iter().map(|i| i.number).collect()
        }

        #[test]
        fn descending_first_label_then_unlabeled() {
            let issues = vec![issue(1, &["zebra"]), issue(2, &["apple"]), issue(3, &[])];
            assert_eq!(order(&issues), vec![1, 2, 3]);

            let shuffled = vec![issue(3, &[]), issue(2, &["apple"]), issue(1, &["zebra"])];
            assert_eq!(order(&shuffled), vec![1, 2, 3]);
        }

        #[test]
        fn only_first_label_counts() {
            let issues = vec![issue(1, &["apple", "zebra"]), issue(2, &["mango"])];
            assert_eq!(order(&issues), vec![2, 1]);
        }

        #[test]
        fn ties_keep_input_order() {
            let issues = vec![
                issue(4, &[]),
                issue(1, &["bug", "ui"]),
                issue(5, &[]),
                issue(2, &["bug"]),
                issue(3, &["bug", "docs"]),
            ];
            assert_eq!(order(&issues), vec![1, 2, 3, 4, 5]);
        }

        #[test]
        fn compare_is_consistent() {
            let labeled = issue(1, &["a"]);
            let unlabeled = issue(2, &[]);
            assert_eq!(compare_for_display(&labeled, &unlabeled), Ordering::Less);
            assert_eq!(compare_for_display(&unlabeled, &labeled), Ordering::Greater);
            assert_eq!(compare_for_display(&unlabeled, &unlabeled), Ordering::Equal);
        }
    }
}
