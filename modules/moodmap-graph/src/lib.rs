//! Mood graph engine.
//!
//! Computes the strongest transitive relationship between every pair of mood
//! tags from a sparse set of directed weighted edges, caches the derived
//! matrix behind an atomic swap, and expands raw tag requests into the full
//! weighted table that search scores against.

pub mod cache;
pub mod closure;
pub mod expand;
pub mod source;

pub use cache::MoodGraphCache;
pub use closure::MoodGraph;
pub use expand::expand_tag_weights;
pub use source::RelationshipSource;
