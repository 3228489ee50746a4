use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum MoodMapError {
    #[error("relationship weight {0} is outside [0, 1]")]
    InvalidWeight(f64),

    #[error("search requires at least one tag")]
    EmptyQuery,

    #[error("result limit must be greater than zero")]
    NonPositiveLimit,

    #[error("rating {0} is outside 1..=10")]
    InvalidRating(i32),

    #[error("tag not found: {0}")]
    TagNotFound(String),

    #[error("tag '{0}' is still referenced and cannot be deleted")]
    TagReferenced(String),

    #[error("establishment not found: {0}")]
    EstablishmentNotFound(Uuid),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
