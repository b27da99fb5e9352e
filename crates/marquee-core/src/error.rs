use marquee_store::StoreError;
use thiserror::Error;

/// Failures surfaced to the presentation layer
#[derive(Debug, Error)]
pub enum CoreError {
    /// The movie collection (or a review list) could not be loaded
    #[error("failed to load {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: StoreError,
    },

    /// A remote write failed; local state is unchanged
    #[error("failed to {action}: {source}")]
    Mutation {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    /// Review counts, snippets or dashboard statistics could not be computed
    #[error("failed to compute review statistics: {0}")]
    Aggregation(#[source] StoreError),

    /// Rejected before any remote call was made
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether the failing view should show a blocking error state
    /// instead of a notification.
    pub fn is_blocking(&self) -> bool {
        matches!(self, CoreError::Fetch { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("review text cannot be empty")]
    EmptyReviewText,

    #[error("mark \"{title}\" as watched before reviewing it")]
    MovieNotWatched { title: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("year {year} is outside {min}..={max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    #[error("no movie with id {0}")]
    UnknownMovie(String),
}
