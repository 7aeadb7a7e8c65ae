//! Integration tests for changelog generation.
//!
//! These tests drive `Generator` end to end over `MockForge`: tags are
//! resolved, windows planned, and the full document rendered.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use ghchangelog::core::config::{ChangelogOptions, FileConfig};
use ghchangelog::core::errors::ChangelogError;
use ghchangelog::core::generate::Generator;
use ghchangelog::core::types::{Issue, PullRequest, Tag};
use ghchangelog::core::window::DocumentMode;
use ghchangelog::forge::mock::{FailOn, MockForge, MockOperation};
use ghchangelog::forge::ForgeError;
use ghchangelog::ui::output::Verbosity;

// =============================================================================
// Fixtures
// =============================================================================

fn month(m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, m, 1, 0, 0, 0).unwrap()
}

fn options(mode: DocumentMode) -> ChangelogOptions {
    let layers = FileConfig {
        user: Some("octo".into()),
        project: Some("widgets".into()),
        date_format: Some("%Y-%m".into()),
        ..Default::default()
    };
    ChangelogOptions::resolve(layers, None, mode, false).unwrap()
}

fn pr(number: u64, merged_at: DateTime<Utc>) -> PullRequest {
    PullRequest {
        number,
        title: format!("Change {number}"),
        merged_at: Some(merged_at),
        author_login: "dev".into(),
        author_url: "https://github.com/dev".into(),
        html_url: format!("https://github.com/octo/widgets/pull/{number}"),
        labels: vec![],
    }
}

fn issue(number: u64, closed_at: DateTime<Utc>, labels: &[&str]) -> Issue {
    Issue {
        number,
        title: format!("Problem {number}"),
        closed_at: Some(closed_at),
        html_url: format!("https://github.com/octo/widgets/issues/{number}"),
        labels: labels.iter().map(|s| s.to_string()).collect(),
    }
}

/// Tags v1..v4 at months 1..4, listed out of chronological order.
fn four_tags() -> MockForge {
    MockForge::new()
        .with_tag(Tag::new("v2", "s2"), month(2))
        .with_tag(Tag::new("v4", "s4"), month(4))
        .with_tag(Tag::new("v1", "s1"), month(1))
        .with_tag(Tag::new("v3", "s3"), month(3))
}

async fn generate(forge: &MockForge, mode: DocumentMode) -> Result<String, ChangelogError> {
    Generator::new(Arc::new(forge.clone()), options(mode), Verbosity::Quiet)
        .generate()
        .await
}

fn headings(document: &str) -> Vec<&str> {
    document
        .lines()
        .filter(|l| l.starts_with("## "))
        .collect()
}

// =============================================================================
// Document modes
// =============================================================================

#[tokio::test]
async fn full_history_has_one_section_per_tag_newest_first() {
    let forge = four_tags();
    let document = generate(&forge, DocumentMode::FullHistory).await.unwrap();

    let headings = headings(&document);
    assert_eq!(headings.len(), 4);
    assert!(headings[0].starts_with("## [v4]"));
    assert!(headings[1].starts_with("## [v3]"));
    assert!(headings[2].starts_with("## [v2]"));
    assert!(headings[3].starts_with("## [v1]"));
    assert!(document.starts_with("# Changelog\n\n"));
    assert!(document.ends_with("*This changelog was automatically generated by ghchangelog*\n"));
}

#[tokio::test]
async fn full_history_single_tag_covers_everything_before_it() {
    let forge = MockForge::new()
        .with_tag(Tag::new("v1", "s1"), month(6))
        .with_pull_request(pr(1, month(1)))
        .with_pull_request(pr(2, month(7)));

    let document = generate(&forge, DocumentMode::FullHistory).await.unwrap();

    assert_eq!(headings(&document).len(), 1);
    assert!(document.contains("Change 1"));
    assert!(!document.contains("Change 2"));
}

#[tokio::test]
async fn last_two_renders_the_newest_window() {
    let forge = four_tags()
        .with_pull_request(pr(10, month(4)))
        .with_pull_request(pr(11, month(3)));

    let document = generate(&forge, DocumentMode::LastTwo).await.unwrap();

    assert_eq!(headings(&document).len(), 1);
    assert!(headings(&document)[0].starts_with("## [v4]"));
    assert!(document.contains("Change 10"));
    assert!(!document.contains("Change 11"));
}

#[tokio::test]
async fn explicit_range_spans_the_named_tags() {
    let forge = four_tags()
        .with_pull_request(pr(1, month(1)))
        .with_pull_request(pr(2, Utc.with_ymd_and_hms(2023, 2, 15, 0, 0, 0).unwrap()))
        .with_pull_request(pr(3, month(3)))
        .with_pull_request(pr(4, month(4)));

    let mode = DocumentMode::Range {
        tag1: "v3".into(),
        tag2: "v1".into(),
    };
    let document = generate(&forge, mode).await.unwrap();

    assert_eq!(headings(&document).len(), 1);
    assert!(headings(&document)[0].starts_with("## [v3]"));
    assert!(document.contains("#### 2023-03\n"));
    assert!(!document.contains("Change 1 "));
    assert!(document.contains("Change 2"));
    assert!(document.contains("Change 3"));
    assert!(!document.contains("Change 4"));
}

#[tokio::test]
async fn explicit_range_with_unknown_tag() {
    let forge = four_tags();
    let mode = DocumentMode::Range {
        tag1: "v4".into(),
        tag2: "v0.9".into(),
    };

    match generate(&forge, mode).await {
        Err(ChangelogError::UnknownTag(name)) => assert_eq!(name, "v0.9"),
        other => panic!("expected UnknownTag, got {other:?}"),
    }
}

#[tokio::test]
async fn no_tags_is_an_error() {
    let forge = MockForge::new().with_pull_request(pr(1, month(1)));
    assert!(matches!(
        generate(&forge, DocumentMode::FullHistory).await,
        Err(ChangelogError::NoTags)
    ));
}

// =============================================================================
// Windows
// =============================================================================

#[tokio::test]
async fn item_at_tag_time_appears_once() {
    let forge = four_tags()
        .with_pull_request(pr(7, month(3)))
        .with_issue(issue(8, month(3), &["bug"]));

    let document = generate(&forge, DocumentMode::FullHistory).await.unwrap();

    assert_eq!(document.matches("Change 7").count(), 1);
    assert_eq!(document.matches("Problem 8").count(), 1);

    let v3 = document.find("## [v3]").unwrap();
    let v2 = document.find("## [v2]").unwrap();
    let item = document.find("Change 7").unwrap();
    assert!(v3 < item && item < v2);
}

#[tokio::test]
async fn items_after_newest_tag_are_left_out() {
    let forge = four_tags().with_pull_request(pr(9, month(5)));
    let document = generate(&forge, DocumentMode::FullHistory).await.unwrap();
    assert!(!document.contains("Change 9"));
}

// =============================================================================
// Labels
// =============================================================================

#[tokio::test]
async fn issue_allow_list_and_classification() {
    let forge = four_tags()
        .with_issue(issue(1, month(4), &["question"]))
        .with_issue(issue(2, month(4), &["enhancement", "bug"]))
        .with_issue(issue(3, month(4), &[]))
        .with_issue(issue(4, month(4), &["enhancement"]));

    let document = generate(&forge, DocumentMode::LastTwo).await.unwrap();

    assert!(!document.contains("Problem 1"));
    assert!(document.contains("- *Fixed bug:* Problem 2"));
    assert!(document.contains("- *Closed issue:* Problem 3"));
    assert!(document.contains("- *Implemented enhancement:* Problem 4"));

    // Display order: first label descending, unlabeled last
    let p2 = document.find("Problem 2").unwrap();
    let p4 = document.find("Problem 4").unwrap();
    let p3 = document.find("Problem 3").unwrap();
    assert!(p2 < p3 && p4 < p3);
}

#[tokio::test]
async fn unlabeled_issues_can_be_excluded() {
    let forge = four_tags().with_issue(issue(3, month(4), &[]));
    let mut opts = options(DocumentMode::LastTwo);
    opts.add_issues_without_labels = false;

    let document = Generator::new(Arc::new(forge), opts, Verbosity::Quiet)
        .generate()
        .await
        .unwrap();

    assert!(!document.contains("Problem 3"));
}

#[tokio::test]
async fn pull_request_allow_list() {
    let forge = four_tags()
        .with_pull_request(pr(1, month(4)))
        .with_pull_request(pr(2, month(4)))
        .with_pull_request(pr(3, month(4)))
        .with_pr_labels(1, vec!["backend".into(), "ui".into()])
        .with_pr_labels(2, vec!["ui".into()])
        .with_pr_labels(3, vec![]);
    let mut opts = options(DocumentMode::LastTwo);
    opts.pull_request_labels = Some(vec!["backend".into()]);

    let document = Generator::new(Arc::new(forge), opts, Verbosity::Quiet)
        .generate()
        .await
        .unwrap();

    assert!(document.contains("Change 1"));
    assert!(!document.contains("Change 2"));
    assert!(document.contains("Change 3"));
}

// =============================================================================
// Lookups
// =============================================================================

#[tokio::test]
async fn each_tag_is_looked_up_once() {
    let forge = four_tags();
    generate(&forge, DocumentMode::FullHistory).await.unwrap();

    assert_eq!(forge.total_commit_lookups(), 4);
    for sha in ["s1", "s2", "s3", "s4"] {
        assert_eq!(forge.commit_lookups(sha), 1);
    }
}

#[tokio::test]
async fn lookup_failure_aborts() {
    let forge = four_tags().fail_on(FailOn::CommitTimestamp {
        sha: "s2".into(),
        error: ForgeError::NotFound("No commit found for SHA: s2".into()),
    });

    match generate(&forge, DocumentMode::FullHistory).await {
        Err(ChangelogError::Lookup { tag, sha, .. }) => {
            assert_eq!(tag, "v2");
            assert_eq!(sha, "s2");
        }
        other => panic!("expected Lookup, got {other:?}"),
    }
}

#[tokio::test]
async fn dangling_tag_is_a_lookup_error() {
    let forge = four_tags().with_dangling_tag(Tag::new("broken", "nowhere"));
    assert!(matches!(
        generate(&forge, DocumentMode::LastTwo).await,
        Err(ChangelogError::Lookup { .. })
    ));
}

#[tokio::test]
async fn disabled_sections_skip_their_fetches() {
    let forge = four_tags();
    let mut opts = options(DocumentMode::FullHistory);
    opts.issues = false;

    Generator::new(Arc::new(forge.clone()), opts, Verbosity::Quiet)
        .generate()
        .await
        .unwrap();

    let ops = forge.operations();
    assert!(ops.contains(&MockOperation::ListPullRequests));
    assert!(!ops.contains(&MockOperation::ListIssues));
}
