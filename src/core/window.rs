//! core::window
//!
//! Time windows between consecutive tags, and selection of the pull
//! requests and issues that fall inside them.
//!
//! # Boundaries
//!
//! A window is the half-open interval `(older, newer]`. The newer tag's
//! instant is inclusive and the older tag's instant is exclusive, so an item
//! stamped exactly at a tag lands in that tag's section and never in the
//! next-older one. The oldest window has no lower bound: `(-inf, newer]`.

use chrono::{DateTime, Utc};

use super::errors::ChangelogError;
use super::types::ResolvedTag;

/// Which sections a document contains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentMode {
    /// One section per consecutive tag pair, plus one for everything up to
    /// the oldest tag.
    #[default]
    FullHistory,
    /// One section between the two most recent tags.
    LastTwo,
    /// One section between two named tags.
    Range {
        /// First named tag
        tag1: String,
        /// Second named tag
        tag2: String,
    },
}

/// A half-open time interval ending at a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Exclusive lower bound; `None` means unbounded below
    pub older_bound: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub newer_bound: DateTime<Utc>,
    /// Name of the tag at the upper bound
    pub newer_tag: String,
}

impl Window {
    /// Window `(older, newer]` between two resolved tags.
    pub fn between(older: &ResolvedTag, newer: &ResolvedTag) -> Self {
        Self {
            older_bound: Some(older.timestamp),
            newer_bound: newer.timestamp,
            newer_tag: newer.name().to_string(),
        }
    }

    /// Window `(-inf, newer]` ending at a resolved tag.
    pub fn up_to(newer: &ResolvedTag) -> Self {
        Self {
            older_bound: None,
            newer_bound: newer.timestamp,
            newer_tag: newer.name().to_string(),
        }
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        let above_older = match self.older_bound {
            Some(older) => t > older,
            None => true,
        };
        above_older && t <= self.newer_bound
    }

    /// Items whose `field` timestamp falls inside the window.
    pub fn select<'a, T, F>(&self, items: &'a [T], field: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> Option<DateTime<Utc>>,
    {
        select_in_window(items, field, self.newer_bound, self.older_bound)
    }
}

/// Select the items whose timestamp lies in `(older_bound, newer_bound]`.
///
/// Items without a timestamp are never selected. With no `older_bound`
/// the interval is unbounded below. Input order is preserved.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ghchangelog::core::window::select_in_window;
///
/// let t = |d| Some(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
/// let items = vec![("a", t(1)), ("b", t(5)), ("c", None)];
///
/// let picked = select_in_window(&items, |i| i.1, t(5).unwrap(), t(1));
/// assert_eq!(picked.len(), 1);
/// assert_eq!(picked[0].0, "b");
/// ```
pub fn select_in_window<'a, T, F>(
    items: &'a [T],
    field: F,
    newer_bound: DateTime<Utc>,
    older_bound: Option<DateTime<Utc>>,
) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    items
        .iter()
        .filter(|item| match field(item) {
            Some(t) => older_bound.map_or(true, |older| t > older) && t <= newer_bound,
            None => false,
        })
        .collect()
}

/// Plan the windows a document renders, newest first.
///
/// `sorted` must be ordered newest first (see
/// [`TagTimeline::sort_descending`](super::timeline::TagTimeline::sort_descending)).
///
/// # Errors
///
/// - `NoTags` if `sorted` is empty
/// - `UnknownTag` if a range names a tag that isn't in `sorted`
pub fn plan_windows(
    mode: &DocumentMode,
    sorted: &[ResolvedTag],
) -> Result<Vec<Window>, ChangelogError> {
    let (newest, oldest) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ChangelogError::NoTags),
    };

    match mode {
        DocumentMode::FullHistory => {
            let mut windows: Vec<Window> = sorted
                .windows(2)
                .map(|pair| Window::between(&pair[1], &pair[0]))
                .collect();
            windows.push(Window::up_to(oldest));
            Ok(windows)
        }
        DocumentMode::LastTwo => match sorted.get(1) {
            Some(previous) => Ok(vec![Window::between(previous, newest)]),
            None => Ok(vec![Window::up_to(newest)]),
        },
        DocumentMode::Range { tag1, tag2 } => {
            let i1 = position(sorted, tag1)?;
            let i2 = position(sorted, tag2)?;
            let (newer, older) = if i1 <= i2 { (i1, i2) } else { (i2, i1) };
            Ok(vec![Window::between(&sorted[older], &sorted[newer])])
        }
    }
}

fn position(sorted: &[ResolvedTag], name: &str) -> Result<usize, ChangelogError> {
    sorted
        .iter()
        .position(|t| t.name() == name)
        .ok_or_else(|| ChangelogError::UnknownTag(name.to_string()))
}
