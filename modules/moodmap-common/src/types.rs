use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MoodMapError;

// --- Weights ---

/// A relationship or match weight, validated into [0, 1] at construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    /// Weight of an exact tag match.
    pub const MAX: Weight = Weight(1.0);

    pub fn new(value: f64) -> Result<Self, MoodMapError> {
        // NaN fails the range check and is rejected too.
        if !(0.0..=1.0).contains(&value) {
            return Err(MoodMapError::InvalidWeight(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

// --- Tags ---

/// A mood tag: a named ambience/emotional descriptor like "Cozy".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            created_at: Utc::now(),
        }
    }
}

/// A directed weighted edge between two mood tags: how much satisfying
/// `target` also satisfies the intent behind `source`.
///
/// Authoring tooling writes both directions with equal weight, but nothing
/// downstream may assume symmetry — `source → target` and `target → source`
/// are independent edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRelationship {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl TagRelationship {
    /// Build a relationship, rejecting weights outside [0, 1].
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
    ) -> Result<Self, MoodMapError> {
        Weight::new(weight)?;
        Ok(Self {
            source: source.into(),
            target: target.into(),
            weight,
        })
    }
}

// --- Establishments ---

/// How many times a tag has been attributed to an establishment.
/// Unique per (establishment, tag); repeated attributions increment `count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub tag_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Establishment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<TagCount>,
    pub created_at: DateTime<Utc>,
}

impl Establishment {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn tag_count(&self, tag_name: &str) -> Option<u32> {
        self.tags
            .iter()
            .find(|t| t.tag_name == tag_name)
            .map(|t| t.count)
    }
}

/// A search result: an establishment plus its transient score.
/// Scores exist only as search output and are never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEstablishment {
    pub establishment: Establishment,
    /// Contribution from tags the user asked for (weight 1.0).
    pub direct_score: f64,
    /// Contribution from graph-propagated related tags.
    pub related_score: f64,
    /// Total: `direct_score + related_score`.
    pub score: f64,
}

/// A user comment on an establishment, rating in 1..=10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

// --- Tag weights ---

#[derive(Debug, Clone, Copy)]
pub struct TagWeight {
    pub weight: Weight,
    /// True when the tag was requested by the user, false when propagated
    /// through the mood graph. Direct entries are pinned at 1.0.
    pub direct: bool,
}

/// The expanded tag → weight table a search scores against.
///
/// Direct entries always carry weight 1.0 and are never reduced by a
/// propagated weight; propagated entries keep the strongest weight seen
/// across all paths and request tags.
#[derive(Debug, Clone, Default)]
pub struct TagWeights {
    entries: HashMap<String, TagWeight>,
}

impl TagWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an all-direct table from caller-supplied weights, validating
    /// each into [0, 1]. Used by exact-tag search, which skips expansion.
    pub fn from_exact<I>(weights: I) -> Result<Self, MoodMapError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut entries = HashMap::new();
        for (tag, raw) in weights {
            let weight = Weight::new(raw)?;
            entries.insert(
                tag,
                TagWeight {
                    weight,
                    direct: true,
                },
            );
        }
        Ok(Self { entries })
    }

    /// Record a tag the user asked for. Idempotent: duplicates in the
    /// request collapse to a single 1.0 entry.
    pub fn insert_direct(&mut self, tag: impl Into<String>) {
        self.entries.insert(
            tag.into(),
            TagWeight {
                weight: Weight::MAX,
                direct: true,
            },
        );
    }

    /// Merge a graph-propagated weight: keep the strongest weight for the
    /// tag, and never touch a direct entry.
    pub fn merge_related(&mut self, tag: &str, weight: Weight) {
        match self.entries.get_mut(tag) {
            Some(entry) => {
                if !entry.direct && weight > entry.weight {
                    entry.weight = weight;
                }
            }
            None => {
                self.entries.insert(
                    tag.to_string(),
                    TagWeight {
                        weight,
                        direct: false,
                    },
                );
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<TagWeight> {
        self.entries.get(tag).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TagWeight)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
