//! Establishment search.
//!
//! Scores venues against an expanded tag-weight table and ranks them, and
//! provides the tag and establishment services plus the storage ports they
//! reach the host application through.

pub mod establishments;
pub mod memory;
pub mod scorer;
pub mod tags;
pub mod traits;

pub use establishments::EstablishmentService;
pub use memory::MemoryStore;
pub use scorer::score_and_rank;
pub use tags::TagService;
pub use traits::{CommentStore, EstablishmentStore, TagStore};
