//! Tag-weight expansion: a raw tag request becomes the full weighted table.

use moodmap_common::{MoodMapError, TagWeights, Weight};

use crate::closure::MoodGraph;

/// Expand requested tags into the tag → weight table search scores against.
///
/// Every requested tag enters at 1.0 (duplicates collapse); every mood
/// reachable from a requested tag enters at its closure weight, keeping the
/// strongest weight when reachable from several request tags. A propagated
/// weight never overrides a direct 1.0 entry. Tags unknown to the graph are
/// not an error — they stay direct-only and simply propagate nothing.
///
/// An empty request yields an empty table; callers reject that as an empty
/// query before any venue data is touched.
pub fn expand_tag_weights(
    requested: &[String],
    graph: &MoodGraph,
) -> Result<TagWeights, MoodMapError> {
    let mut weights = TagWeights::new();

    for tag in requested {
        weights.insert_direct(tag.clone());
    }

    for tag in requested {
        for (related, w) in graph.related(tag, 0.0) {
            weights.merge_related(&related, Weight::new(w)?);
        }
    }

    Ok(weights)
}
