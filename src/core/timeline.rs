//! core::timeline
//!
//! Resolves tags to the committer time of the commit they point to, and
//! orders them newest first.
//!
//! # Caching
//!
//! Each resolution is a network round trip, so results are memoized by tag
//! name for the lifetime of one [`TagTimeline`]. A timeline is built fresh
//! for every generation run; nothing leaks across runs.
//!
//! The cache holds one `OnceCell` per tag name. Concurrent resolutions of
//! the same name wait on the same cell, so the forge sees at most one
//! lookup per name even when tasks race.
//!
//! # Concurrency
//!
//! [`TagTimeline::sort_descending`] resolves every tag on its own task (at
//! most [`MAX_CONCURRENT_LOOKUPS`] in flight) and joins all of them before
//! sorting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::{OnceCell, Semaphore};
use tokio::task::JoinSet;

use super::errors::ChangelogError;
use super::types::{ResolvedTag, Tag};
use crate::forge::Forge;

/// Upper bound on commit lookups in flight at once.
pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

type Slot = Arc<OnceCell<DateTime<Utc>>>;

/// Memoizing tag timestamp resolver.
///
/// Cloning is cheap and clones share the cache.
#[derive(Clone)]
pub struct TagTimeline {
    forge: Arc<dyn Forge>,
    cache: Arc<Mutex<HashMap<String, Slot>>>,
}

impl std::fmt::Debug for TagTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagTimeline")
            .field("forge", &self.forge.name())
            .field("cached", &self.cached_count())
            .finish()
    }
}

impl TagTimeline {
    /// Create a timeline with an empty cache.
    pub fn new(forge: Arc<dyn Forge>) -> Self {
        Self {
            forge,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get (or create) the cache slot for a tag name.
    fn slot(&self, name: &str) -> Slot {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(name.to_string()).or_default())
    }

    /// Resolve a tag to its commit timestamp.
    ///
    /// The first call for a tag name asks the forge; later calls return the
    /// cached value.
    ///
    /// # Errors
    ///
    /// `ChangelogError::Lookup` if the forge can't supply the commit. A failed
    /// lookup is not cached.
    pub async fn resolve(&self, tag: &Tag) -> Result<DateTime<Utc>, ChangelogError> {
        let slot = self.slot(&tag.name);
        let time = slot
            .get_or_try_init(|| async {
                self.forge
                    .commit_timestamp(&tag.commit_sha)
                    .await
                    .map_err(|source| ChangelogError::Lookup {
                        tag: tag.name.clone(),
                        sha: tag.commit_sha.clone(),
                        source,
                    })
            })
            .await?;
        Ok(*time)
    }

    /// Cached timestamp for a tag name, if already resolved.
    pub fn cached(&self, name: &str) -> Option<DateTime<Utc>> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(name).and_then(|slot| slot.get().copied())
    }

    /// Number of tag names with a resolved timestamp.
    pub fn cached_count(&self) -> usize {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.values().filter(|slot| slot.initialized()).count()
    }

    /// Resolve every tag concurrently, preserving input order.
    ///
    /// Returns only after every resolution has finished.
    pub async fn resolve_all(&self, tags: &[Tag]) -> Result<Vec<ResolvedTag>, ChangelogError> {
        let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_LOOKUPS));
        let mut set = JoinSet::new();

        for (index, tag) in tags.iter().cloned().enumerate() {
            let timeline = self.clone();
            let permits = Arc::clone(&permits);
            set.spawn(async move {
                // The semaphore is never closed, so a permit is always granted
                let _permit = permits.acquire_owned().await.ok();
                let result = timeline.resolve(&tag).await;
                (index, tag, result)
            });
        }

        let mut resolved: Vec<Option<ResolvedTag>> = vec![None; tags.len()];
        while let Some(joined) = set.join_next().await {
            let (index, tag, result) =
                joined.map_err(|e| ChangelogError::Internal(e.to_string()))?;
            resolved[index] = Some(ResolvedTag {
                tag,
                timestamp: result?,
            });
        }

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Resolve every tag and order them newest first.
    ///
    /// Tags with equal timestamps keep their input order.
    pub async fn sort_descending(&self, tags: &[Tag]) -> Result<Vec<ResolvedTag>, ChangelogError> {
        let mut resolved = self.resolve_all(tags).await?;
        resolved.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(resolved)
    }
}
