//! In-memory store for tests and embedding. No database required.
//!
//! One store backs every port, the way a single database would, so
//! referential checks (tag deletion guards) see the whole picture.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use moodmap_common::{Comment, Establishment, Tag, TagCount, TagRelationship};
use moodmap_graph::RelationshipSource;

use crate::traits::{CommentStore, EstablishmentStore, TagStore};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tags: HashMap<String, Tag>,
    relationships: Vec<TagRelationship>,
    establishments: HashMap<Uuid, Establishment>,
    comments: Vec<Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored comments (for test assertions).
    pub fn comments(&self) -> Vec<Comment> {
        self.inner.lock().unwrap().comments.clone()
    }

    /// All stored relationships (for test assertions).
    pub fn relationships(&self) -> Vec<TagRelationship> {
        self.inner.lock().unwrap().relationships.clone()
    }
}

#[async_trait]
impl RelationshipSource for MemoryStore {
    async fn all_relationships(&self) -> Result<Vec<TagRelationship>> {
        Ok(self.inner.lock().unwrap().relationships.clone())
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.inner.lock().unwrap().tags.contains_key(name))
    }

    async fn get_tag(&self, name: &str) -> Result<Option<Tag>> {
        Ok(self.inner.lock().unwrap().tags.get(name).cloned())
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.inner.lock().unwrap().tags.values().cloned().collect())
    }

    async fn save_tag(&self, tag: Tag) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .tags
            .insert(tag.name.clone(), tag);
        Ok(())
    }

    async fn save_relationship(&self, relationship: TagRelationship) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .relationships
            .iter()
            .position(|r| r.source == relationship.source && r.target == relationship.target)
        {
            Some(i) => inner.relationships[i].weight = relationship.weight,
            None => inner.relationships.push(relationship),
        }
        Ok(())
    }

    async fn tag_referenced(&self, name: &str) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        let in_relationships = inner
            .relationships
            .iter()
            .any(|r| r.source == name || r.target == name);
        let in_establishments = inner
            .establishments
            .values()
            .any(|e| e.tags.iter().any(|t| t.tag_name == name));
        Ok(in_relationships || in_establishments)
    }

    async fn delete_tag(&self, name: &str) -> Result<()> {
        self.inner.lock().unwrap().tags.remove(name);
        Ok(())
    }
}

#[async_trait]
impl EstablishmentStore for MemoryStore {
    async fn save(&self, establishment: Establishment) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .establishments
            .insert(establishment.id, establishment);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Establishment>> {
        Ok(self.inner.lock().unwrap().establishments.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Establishment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .establishments
            .values()
            .cloned()
            .collect())
    }

    async fn add_tag_count(&self, establishment_id: Uuid, tag_name: &str) -> Result<u32> {
        let mut inner = self.inner.lock().unwrap();
        let establishment = inner
            .establishments
            .get_mut(&establishment_id)
            .ok_or_else(|| anyhow!("establishment {establishment_id} not found"))?;

        if let Some(tag_count) = establishment
            .tags
            .iter_mut()
            .find(|t| t.tag_name == tag_name)
        {
            tag_count.count += 1;
            return Ok(tag_count.count);
        }

        establishment.tags.push(TagCount {
            tag_name: tag_name.to_string(),
            count: 1,
        });
        Ok(1)
    }

    async fn candidates_for_tags(&self, tags: &[String]) -> Result<Vec<Establishment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .establishments
            .values()
            .filter(|e| e.tags.iter().any(|t| tags.contains(&t.tag_name)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn save(&self, comment: Comment) -> Result<()> {
        self.inner.lock().unwrap().comments.push(comment);
        Ok(())
    }
}
