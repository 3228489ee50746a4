//! Tag catalog service: authoring tags and relationships, and serving the
//! derived mood graph.
//!
//! Owns the `MoodGraphCache` — every relationship mutation goes through this
//! service, so invalidation stays next to the writes that require it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use moodmap_common::{Config, MoodMapError, Tag, TagRelationship};
use moodmap_graph::{MoodGraph, MoodGraphCache};

use crate::traits::TagStore;

pub struct TagService<S: TagStore> {
    store: Arc<S>,
    cache: MoodGraphCache,
    config: Config,
}

impl<S: TagStore> TagService<S> {
    pub fn new(store: Arc<S>, config: Config) -> Self {
        Self {
            store,
            cache: MoodGraphCache::new(),
            config,
        }
    }

    pub async fn create_tag(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Tag, MoodMapError> {
        let tag = Tag::new(name, description);
        self.store.save_tag(tag.clone()).await?;
        Ok(tag)
    }

    /// Idempotent creation used when tagging an establishment with a tag
    /// that may not exist yet.
    pub async fn create_tag_if_missing(&self, name: &str) -> Result<(), MoodMapError> {
        if !self.store.tag_exists(name).await? {
            self.store.save_tag(Tag::new(name, None)).await?;
        }
        Ok(())
    }

    /// Edit a tag's description. Tags are otherwise immutable once created.
    pub async fn update_description(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Tag, MoodMapError> {
        let Some(mut tag) = self.store.get_tag(name).await? else {
            return Err(MoodMapError::TagNotFound(name.to_string()));
        };
        tag.description = description;
        self.store.save_tag(tag.clone()).await?;
        Ok(tag)
    }

    pub async fn get_tag(&self, name: &str) -> Result<Option<Tag>, MoodMapError> {
        Ok(self.store.get_tag(name).await?)
    }

    pub async fn all_tags(&self) -> Result<Vec<Tag>, MoodMapError> {
        Ok(self.store.all_tags().await?)
    }

    /// Author a relationship between two existing tags.
    ///
    /// Writes both directions at equal weight as an authoring convenience;
    /// the graph engine still treats each direction as an independent edge.
    /// Invalidates the cached mood graph.
    pub async fn create_relationship(
        &self,
        source: &str,
        target: &str,
        weight: f64,
    ) -> Result<(), MoodMapError> {
        let forward = TagRelationship::new(source, target, weight)?;
        let backward = TagRelationship::new(target, source, weight)?;

        if !self.store.tag_exists(source).await? {
            return Err(MoodMapError::TagNotFound(source.to_string()));
        }
        if !self.store.tag_exists(target).await? {
            return Err(MoodMapError::TagNotFound(target.to_string()));
        }

        self.store.save_relationship(forward).await?;
        self.store.save_relationship(backward).await?;
        self.cache.invalidate();

        info!(source, target, weight, "Tag relationship created");
        Ok(())
    }

    /// Delete a tag. Rejected while any relationship or establishment
    /// tag-count still references it — never cascaded.
    pub async fn delete_tag(&self, name: &str) -> Result<(), MoodMapError> {
        if !self.store.tag_exists(name).await? {
            return Err(MoodMapError::TagNotFound(name.to_string()));
        }
        if self.store.tag_referenced(name).await? {
            return Err(MoodMapError::TagReferenced(name.to_string()));
        }
        self.store.delete_tag(name).await?;
        info!(name, "Tag deleted");
        Ok(())
    }

    /// The strongest-path closure over the current relationship set,
    /// recomputed through the cache when stale.
    pub async fn mood_graph(&self) -> Result<Arc<MoodGraph>, MoodMapError> {
        self.cache.get_or_compute(self.store.as_ref()).await
    }

    /// Moods related to `name` at or above the configured threshold.
    pub async fn related_moods(&self, name: &str) -> Result<HashMap<String, f64>, MoodMapError> {
        let graph = self.mood_graph().await?;
        Ok(graph.related(name, self.config.min_related_weight))
    }
}
