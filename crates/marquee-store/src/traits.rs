use async_trait::async_trait;
use marquee_models::{Movie, MovieDraft, MovieFlag, NewReview, Review};
use std::fmt;
use crate::error::StoreError;

/// Contract the application core requires of the relational store holding
/// the `movies` and `reviews` tables.
///
/// Every method is a single remote call. Ordering, counting and cascade
/// deletes are the store's job, not the caller's.
#[async_trait]
pub trait DataStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// All movies, newest `created_at` first
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;

    /// Insert with `watched`/`favorite` cleared; returns the created row
    async fn insert_movie(&self, draft: &MovieDraft) -> Result<Movie, StoreError>;

    /// Overwrite the metadata columns of one movie. Flags are left alone.
    async fn update_movie(&self, id: &str, draft: &MovieDraft) -> Result<(), StoreError>;

    async fn set_movie_flag(&self, id: &str, flag: MovieFlag, value: bool) -> Result<(), StoreError>;

    /// Delete one movie; its reviews go with it
    async fn delete_movie(&self, id: &str) -> Result<(), StoreError>;

    /// Reviews of one movie, newest first
    async fn list_reviews(&self, movie_id: &str) -> Result<Vec<Review>, StoreError>;

    /// Exact review count, for one movie or store-wide
    async fn count_reviews(&self, movie_id: Option<&str>) -> Result<u64, StoreError>;

    /// Newest `limit` reviews, for one movie or store-wide
    async fn latest_reviews(&self, movie_id: Option<&str>, limit: usize) -> Result<Vec<Review>, StoreError>;

    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError>;
}

/// Names the query shape behind each `DataStore` method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListMovies,
    InsertMovie,
    UpdateMovie,
    SetMovieFlag,
    DeleteMovie,
    ListReviews,
    CountReviews,
    LatestReviews,
    InsertReview,
}

impl StoreOp {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            StoreOp::InsertMovie
                | StoreOp::UpdateMovie
                | StoreOp::SetMovieFlag
                | StoreOp::DeleteMovie
                | StoreOp::InsertReview
        )
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::ListMovies => "list_movies",
            StoreOp::InsertMovie => "insert_movie",
            StoreOp::UpdateMovie => "update_movie",
            StoreOp::SetMovieFlag => "set_movie_flag",
            StoreOp::DeleteMovie => "delete_movie",
            StoreOp::ListReviews => "list_reviews",
            StoreOp::CountReviews => "count_reviews",
            StoreOp::LatestReviews => "latest_reviews",
            StoreOp::InsertReview => "insert_review",
        };
        f.write_str(name)
    }
}
