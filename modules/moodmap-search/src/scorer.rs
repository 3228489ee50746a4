//! Establishment scoring and ranking.
//!
//! `score(venue) = Σ tag_count(venue, tag) × effective_weight(tag)` over the
//! tags of the venue that appear in the expanded table. Direct (requested)
//! and related (graph-propagated) contributions are accumulated separately
//! and summed for the total.

use moodmap_common::{Establishment, MoodMapError, ScoredEstablishment, TagWeights};

/// Score every candidate against `weights` and return the top `limit`
/// results, descending by score with ascending establishment id breaking
/// ties. Venues with no qualifying tag score 0 and are excluded.
///
/// An empty weight table is an empty query; a zero limit is rejected, never
/// clamped to the default.
pub fn score_and_rank(
    weights: &TagWeights,
    establishments: Vec<Establishment>,
    limit: usize,
) -> Result<Vec<ScoredEstablishment>, MoodMapError> {
    if weights.is_empty() {
        return Err(MoodMapError::EmptyQuery);
    }
    if limit == 0 {
        return Err(MoodMapError::NonPositiveLimit);
    }

    let mut scored: Vec<ScoredEstablishment> = establishments
        .into_iter()
        .filter_map(|est| {
            let mut direct = 0.0;
            let mut related = 0.0;
            for tag_count in &est.tags {
                if let Some(entry) = weights.get(&tag_count.tag_name) {
                    let contribution = f64::from(tag_count.count) * entry.weight.value();
                    if entry.direct {
                        direct += contribution;
                    } else {
                        related += contribution;
                    }
                }
            }
            let total = direct + related;
            (total > 0.0).then(|| ScoredEstablishment {
                establishment: est,
                direct_score: direct,
                related_score: related,
                score: total,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.establishment.id.cmp(&b.establishment.id))
    });
    scored.truncate(limit);

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use moodmap_common::{TagCount, Weight};
    use uuid::Uuid;

    use super::*;

    fn venue(name: &str, tags: &[(&str, u32)]) -> Establishment {
        let mut est = Establishment::new(name, "");
        est.tags = tags
            .iter()
            .map(|(tag, count)| TagCount {
                tag_name: tag.to_string(),
                count: *count,
            })
            .collect();
        est
    }

    fn direct_weights(tags: &[&str]) -> TagWeights {
        let mut weights = TagWeights::new();
        for tag in tags {
            weights.insert_direct(*tag);
        }
        weights
    }

    #[test]
    fn single_exact_tag_scores_count_times_one() {
        let weights = direct_weights(&["Cozy"]);
        let v = venue("V", &[("Cozy", 3), ("Relaxed", 2)]);

        let results = score_and_rank(&weights, vec![v], 10).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 3.0);
        assert_eq!(results[0].direct_score, 3.0);
        assert_eq!(results[0].related_score, 0.0);
    }

    #[test]
    fn direct_and_related_contributions_split_and_sum() {
        let mut weights = direct_weights(&["Happy"]);
        weights.merge_related("Excited", Weight::new(0.8).unwrap());

        let v = venue("V", &[("Happy", 2), ("Excited", 5)]);
        let results = score_and_rank(&weights, vec![v], 10).unwrap();

        assert_eq!(results[0].direct_score, 2.0);
        assert_eq!(results[0].related_score, 4.0);
        assert_eq!(results[0].score, 6.0);
    }

    #[test]
    fn zero_scoring_venues_are_excluded() {
        let weights = direct_weights(&["Cozy"]);
        let matching = venue("A", &[("Cozy", 1)]);
        let unrelated = venue("B", &[("Loud", 9)]);

        let results = score_and_rank(&weights, vec![unrelated, matching], 10).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].establishment.name, "A");
    }

    #[test]
    fn results_sorted_descending_and_limited() {
        let weights = direct_weights(&["Cozy"]);
        let venues = vec![
            venue("low", &[("Cozy", 1)]),
            venue("high", &[("Cozy", 7)]),
            venue("mid", &[("Cozy", 4)]),
        ];

        let results = score_and_rank(&weights, venues, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].establishment.name, "high");
        assert_eq!(results[1].establishment.name, "mid");
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let weights = direct_weights(&["Cozy"]);
        let a = venue("A", &[("Cozy", 5)]);
        let b = venue("B", &[("Cozy", 5)]);
        let (first_id, second_id) = if a.id < b.id {
            (a.id, b.id)
        } else {
            (b.id, a.id)
        };

        for _ in 0..5 {
            let results =
                score_and_rank(&weights, vec![a.clone(), b.clone()], 10).unwrap();
            let ids: Vec<Uuid> = results.iter().map(|r| r.establishment.id).collect();
            assert_eq!(ids, vec![first_id, second_id]);
        }
    }

    #[test]
    fn empty_weights_rejected() {
        let err = score_and_rank(&TagWeights::new(), vec![], 10).unwrap_err();
        assert!(matches!(err, MoodMapError::EmptyQuery));
    }

    #[test]
    fn zero_limit_rejected_not_clamped() {
        let weights = direct_weights(&["Cozy"]);
        let err = score_and_rank(&weights, vec![venue("V", &[("Cozy", 1)])], 0).unwrap_err();
        assert!(matches!(err, MoodMapError::NonPositiveLimit));
    }
}
