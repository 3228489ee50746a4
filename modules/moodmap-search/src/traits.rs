//! Storage ports the services depend on.
//!
//! Concrete storage lives in the host application; these traits are the
//! narrow seams it injects through. `MemoryStore` implements all of them
//! for tests and embedding.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use moodmap_common::{Comment, Establishment, Tag, TagRelationship};
use moodmap_graph::RelationshipSource;

/// Tag catalog storage: tags plus the directed weighted edges between them.
#[async_trait]
pub trait TagStore: RelationshipSource {
    async fn tag_exists(&self, name: &str) -> Result<bool>;
    async fn get_tag(&self, name: &str) -> Result<Option<Tag>>;
    async fn all_tags(&self) -> Result<Vec<Tag>>;
    async fn save_tag(&self, tag: Tag) -> Result<()>;

    /// Upsert one directed edge. Re-authoring the same (source, target)
    /// pair replaces its weight.
    async fn save_relationship(&self, relationship: TagRelationship) -> Result<()>;

    /// True when any relationship or establishment tag-count references
    /// `name`. Guards deletion.
    async fn tag_referenced(&self, name: &str) -> Result<bool>;
    async fn delete_tag(&self, name: &str) -> Result<()>;
}

/// Establishment storage, including the per-venue tag counts search reads.
#[async_trait]
pub trait EstablishmentStore: Send + Sync {
    async fn save(&self, establishment: Establishment) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Establishment>>;
    async fn all(&self) -> Result<Vec<Establishment>>;

    /// Increment the (establishment, tag) count, creating it at 1.
    /// Returns the new count.
    async fn add_tag_count(&self, establishment_id: Uuid, tag_name: &str) -> Result<u32>;

    /// Establishments possessing at least one of `tags`.
    async fn candidates_for_tags(&self, tags: &[String]) -> Result<Vec<Establishment>>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn save(&self, comment: Comment) -> Result<()>;
}
