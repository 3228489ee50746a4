//! Establishment service: venue creation, tagging, comments, and the two
//! search modes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use moodmap_common::{
    Comment, Config, Establishment, MoodMapError, ScoredEstablishment, TagWeights,
};
use moodmap_graph::expand_tag_weights;

use crate::scorer::score_and_rank;
use crate::tags::TagService;
use crate::traits::{CommentStore, EstablishmentStore, TagStore};

pub struct EstablishmentService<S: TagStore, E: EstablishmentStore, C: CommentStore> {
    tags: Arc<TagService<S>>,
    establishments: Arc<E>,
    comments: Arc<C>,
    config: Config,
}

impl<S: TagStore, E: EstablishmentStore, C: CommentStore> EstablishmentService<S, E, C> {
    pub fn new(
        tags: Arc<TagService<S>>,
        establishments: Arc<E>,
        comments: Arc<C>,
        config: Config,
    ) -> Self {
        Self {
            tags,
            establishments,
            comments,
            config,
        }
    }

    /// Resolve a caller limit: `None` falls back to the configured default,
    /// zero is rejected, never clamped.
    fn resolve_limit(&self, limit: Option<usize>) -> Result<usize, MoodMapError> {
        match limit {
            Some(0) => Err(MoodMapError::NonPositiveLimit),
            Some(n) => Ok(n),
            None => Ok(self.config.default_search_limit),
        }
    }

    pub async fn create_establishment(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Establishment, MoodMapError> {
        let establishment = Establishment::new(name, description);
        self.establishments.save(establishment.clone()).await?;
        Ok(establishment)
    }

    pub async fn get_establishment(
        &self,
        id: Uuid,
    ) -> Result<Option<Establishment>, MoodMapError> {
        Ok(self.establishments.get(id).await?)
    }

    pub async fn all_establishments(&self) -> Result<Vec<Establishment>, MoodMapError> {
        Ok(self.establishments.all().await?)
    }

    /// Attribute a tag to an establishment, creating the tag if missing.
    /// Repeated attributions increment the (venue, tag) count. Returns the
    /// new count.
    pub async fn add_tag(
        &self,
        establishment_id: Uuid,
        tag_name: &str,
    ) -> Result<u32, MoodMapError> {
        if self.establishments.get(establishment_id).await?.is_none() {
            return Err(MoodMapError::EstablishmentNotFound(establishment_id));
        }
        self.tags.create_tag_if_missing(tag_name).await?;
        let count = self
            .establishments
            .add_tag_count(establishment_id, tag_name)
            .await?;
        Ok(count)
    }

    /// Mood search: expand the requested tags through the mood graph, then
    /// score and rank. Related moods count at their closure weight.
    pub async fn search_by_moods(
        &self,
        tags: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<ScoredEstablishment>, MoodMapError> {
        if tags.is_empty() {
            return Err(MoodMapError::EmptyQuery);
        }
        let limit = self.resolve_limit(limit)?;

        let graph = self.tags.mood_graph().await?;
        let weights = expand_tag_weights(tags, &graph)?;
        self.ranked(weights, limit).await
    }

    /// Exact-tag search: no graph expansion, caller-supplied weights only.
    /// Each weight is validated into [0, 1].
    pub async fn search_by_exact_tags<I>(
        &self,
        tag_weights: I,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredEstablishment>, MoodMapError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let limit = self.resolve_limit(limit)?;
        let weights = TagWeights::from_exact(tag_weights)?;
        if weights.is_empty() {
            return Err(MoodMapError::EmptyQuery);
        }
        self.ranked(weights, limit).await
    }

    async fn ranked(
        &self,
        weights: TagWeights,
        limit: usize,
    ) -> Result<Vec<ScoredEstablishment>, MoodMapError> {
        let candidates = self
            .establishments
            .candidates_for_tags(&weights.tag_names())
            .await?;
        let results = score_and_rank(&weights, candidates, limit)?;
        info!(
            expanded_tags = weights.len(),
            results = results.len(),
            "Search ranked"
        );
        Ok(results)
    }

    /// Comment on an establishment, rating in 1..=10.
    pub async fn add_comment(
        &self,
        establishment_id: Uuid,
        text: &str,
        rating: i32,
    ) -> Result<Comment, MoodMapError> {
        if !(1..=10).contains(&rating) {
            return Err(MoodMapError::InvalidRating(rating));
        }
        if self.establishments.get(establishment_id).await?.is_none() {
            return Err(MoodMapError::EstablishmentNotFound(establishment_id));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            establishment_id,
            text: text.to_string(),
            rating,
            created_at: Utc::now(),
        };
        self.comments.save(comment.clone()).await?;
        Ok(comment)
    }
}
