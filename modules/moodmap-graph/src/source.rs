use anyhow::Result;
use async_trait::async_trait;

use moodmap_common::TagRelationship;

/// Supplies the complete current relationship set on demand.
///
/// Weights are expected to be validated into [0, 1] and endpoint tags to
/// exist; the closure computation re-checks numeric range, nothing else.
/// Implemented by the host's storage layer and by the in-memory stores used
/// in tests.
#[async_trait]
pub trait RelationshipSource: Send + Sync {
    async fn all_relationships(&self) -> Result<Vec<TagRelationship>>;
}
