//! All-pairs strongest-path closure over the tag relationship set.
//!
//! Floyd–Warshall shape, different algebra: weights compose along a path by
//! multiplication and competing paths combine by max. Confidence decays
//! along indirect relationships and the best available path wins.

use std::collections::HashMap;

use tracing::debug;

use moodmap_common::{MoodMapError, TagRelationship};

/// Dense strongest-path weight matrix over every tag that appears in at
/// least one relationship. Tags with no relationships are absent from the
/// matrix and read as weight 0 to everything.
#[derive(Debug, Clone)]
pub struct MoodGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major n×n matrix; `matrix[i * n + j]` is the strongest path i → j.
    matrix: Vec<f64>,
}

impl MoodGraph {
    /// Compute the closure from the complete edge set.
    ///
    /// A weight outside [0, 1] is rejected before any computation — never
    /// clamped. Direction is meaningful: i → j and j → i are independent
    /// cells. Self-pairs stay 0 unless an explicit i → i edge was supplied.
    /// O(n³) in distinct tags; tag vocabularies are small.
    pub fn compute(relationships: &[TagRelationship]) -> Result<Self, MoodMapError> {
        for rel in relationships {
            if !(0.0..=1.0).contains(&rel.weight) {
                return Err(MoodMapError::InvalidWeight(rel.weight));
            }
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut nodes: Vec<String> = Vec::new();
        for rel in relationships {
            for name in [&rel.source, &rel.target] {
                if !index.contains_key(name.as_str()) {
                    index.insert(name.clone(), nodes.len());
                    nodes.push(name.clone());
                }
            }
        }

        let n = nodes.len();
        let mut matrix = vec![0.0; n * n];
        for rel in relationships {
            let i = index[&rel.source];
            let j = index[&rel.target];
            // Duplicate edges keep the strongest direct weight.
            if rel.weight > matrix[i * n + j] {
                matrix[i * n + j] = rel.weight;
            }
        }

        for k in 0..n {
            for i in 0..n {
                let ik = matrix[i * n + k];
                if ik == 0.0 {
                    continue;
                }
                for j in 0..n {
                    let through = ik * matrix[k * n + j];
                    if through > matrix[i * n + j] {
                        matrix[i * n + j] = through;
                    }
                }
            }
        }

        debug!(
            tags = n,
            relationships = relationships.len(),
            "Computed mood graph closure"
        );

        Ok(Self {
            nodes,
            index,
            matrix,
        })
    }

    /// Strongest path weight from `source` to `target`; 0 when either tag is
    /// unknown to the graph or no path exists.
    pub fn weight(&self, source: &str, target: &str) -> f64 {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&i), Some(&j)) => self.matrix[i * self.nodes.len() + j],
            _ => 0.0,
        }
    }

    /// Every mood reachable from `source` with a positive closure weight at
    /// or above `min_weight`.
    pub fn related(&self, source: &str, min_weight: f64) -> HashMap<String, f64> {
        let Some(&i) = self.index.get(source) else {
            return HashMap::new();
        };
        let n = self.nodes.len();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(j, name)| {
                let w = self.matrix[i * n + j];
                (w > 0.0 && w >= min_weight).then(|| (name.clone(), w))
            })
            .collect()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
