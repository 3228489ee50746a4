//! Cache for the derived mood graph.
//!
//! The closure is a derived view of the relationship set: any relationship
//! mutation invalidates it wholesale and the next read recomputes. Readers
//! hold an immutable `Arc` snapshot swapped atomically, so a reader never
//! observes a half-built matrix and readers in flight keep a consistent
//! matrix across an invalidation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::info;

use moodmap_common::MoodMapError;

use crate::closure::MoodGraph;
use crate::source::RelationshipSource;

pub struct MoodGraphCache {
    inner: ArcSwapOption<MoodGraph>,
    /// Bumped on every invalidation. A computed graph is only cached when
    /// the generation is unchanged since the relationship fetch began, so an
    /// invalidation that lands mid-compute always wins over the stale result.
    generation: AtomicU64,
}

impl MoodGraphCache {
    pub fn new() -> Self {
        Self {
            inner: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
        }
    }

    /// Return the cached closure, computing it from `source` when the cache
    /// is empty. Concurrent callers on an empty cache may each compute; the
    /// results are identical unless a mutation interleaves, in which case
    /// the pre-mutation graph is returned to its caller but never cached.
    pub async fn get_or_compute(
        &self,
        source: &dyn RelationshipSource,
    ) -> Result<Arc<MoodGraph>, MoodMapError> {
        if let Some(graph) = self.inner.load_full() {
            return Ok(graph);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let relationships = source.all_relationships().await?;
        let graph = Arc::new(MoodGraph::compute(&relationships)?);

        if self.generation.load(Ordering::SeqCst) == generation {
            self.inner.store(Some(Arc::clone(&graph)));
            // An invalidation may still have raced the store; re-check and
            // clear rather than leave a pre-mutation snapshot cached.
            if self.generation.load(Ordering::SeqCst) != generation {
                self.inner.store(None);
            }
            info!(
                tags = graph.len(),
                relationships = relationships.len(),
                "Mood graph recomputed"
            );
        }
        Ok(graph)
    }

    /// Drop the cached closure; the next read recomputes from the source.
    /// Called after every relationship mutation.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.store(None);
    }
}

impl Default for MoodGraphCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;

    use moodmap_common::TagRelationship;

    use super::*;

    struct CountingSource {
        relationships: Mutex<Vec<TagRelationship>>,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(relationships: Vec<TagRelationship>) -> Self {
            Self {
                relationships: Mutex::new(relationships),
                fetches: AtomicUsize::new(0),
            }
        }

        fn push(&self, rel: TagRelationship) {
            self.relationships.lock().unwrap().push(rel);
        }
    }

    #[async_trait]
    impl RelationshipSource for CountingSource {
        async fn all_relationships(&self) -> Result<Vec<TagRelationship>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.relationships.lock().unwrap().clone())
        }
    }

    fn rel(source: &str, target: &str, weight: f64) -> TagRelationship {
        TagRelationship {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }

    #[tokio::test]
    async fn repeated_reads_compute_once() {
        let source = CountingSource::new(vec![rel("Happy", "Excited", 0.8)]);
        let cache = MoodGraphCache::new();

        let first = cache.get_or_compute(&source).await.unwrap();
        let second = cache.get_or_compute(&source).await.unwrap();

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let source = CountingSource::new(vec![rel("Happy", "Excited", 0.8)]);
        let cache = MoodGraphCache::new();

        let before = cache.get_or_compute(&source).await.unwrap();
        assert_eq!(before.weight("Excited", "Energetic"), 0.0);

        source.push(rel("Excited", "Energetic", 0.9));
        cache.invalidate();

        let after = cache.get_or_compute(&source).await.unwrap();
        assert_eq!(after.weight("Excited", "Energetic"), 0.9);
        assert!((after.weight("Happy", "Energetic") - 0.72).abs() < 1e-12);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    /// A source whose fetch blocks until released, to interleave a mutation
    /// with an in-flight recompute.
    struct GatedSource {
        relationships: Mutex<Vec<TagRelationship>>,
        entered: tokio::sync::Notify,
        release: tokio::sync::Semaphore,
    }

    impl GatedSource {
        fn new(relationships: Vec<TagRelationship>) -> Self {
            Self {
                relationships: Mutex::new(relationships),
                entered: tokio::sync::Notify::new(),
                release: tokio::sync::Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl RelationshipSource for GatedSource {
        async fn all_relationships(&self) -> Result<Vec<TagRelationship>> {
            let snapshot = self.relationships.lock().unwrap().clone();
            self.entered.notify_one();
            let _permit = self.release.acquire().await.unwrap();
            Ok(snapshot)
        }
    }

    #[tokio::test]
    async fn invalidation_during_recompute_is_not_lost() {
        let source = Arc::new(GatedSource::new(vec![rel("Happy", "Excited", 0.8)]));
        let cache = Arc::new(MoodGraphCache::new());

        // Start a read and park it inside the relationship fetch.
        let stalled = tokio::spawn({
            let source = Arc::clone(&source);
            let cache = Arc::clone(&cache);
            async move { cache.get_or_compute(source.as_ref()).await }
        });
        source.entered.notified().await;

        // Mutate and invalidate while that read is still in flight.
        source
            .relationships
            .lock()
            .unwrap()
            .push(rel("Excited", "Energetic", 0.9));
        cache.invalidate();

        // The stalled read resumes with its pre-mutation snapshot.
        source.release.add_permits(1);
        let stale = stalled.await.unwrap().unwrap();
        assert_eq!(stale.weight("Excited", "Energetic"), 0.0);

        // A read starting after the mutation must not see that snapshot.
        source.release.add_permits(1);
        let fresh = cache.get_or_compute(source.as_ref()).await.unwrap();
        assert_eq!(fresh.weight("Excited", "Energetic"), 0.9);
        assert!((fresh.weight("Happy", "Energetic") - 0.72).abs() < 1e-12);
    }

    #[tokio::test]
    async fn invalid_weight_from_source_fails_and_caches_nothing() {
        let source = CountingSource::new(vec![rel("Happy", "Excited", 1.5)]);
        let cache = MoodGraphCache::new();

        let err = cache.get_or_compute(&source).await.unwrap_err();
        assert!(matches!(err, MoodMapError::InvalidWeight(_)));

        // Still empty: the next read goes back to the source.
        cache.get_or_compute(&source).await.unwrap_err();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }
}
