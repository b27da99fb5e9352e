use serde::{Deserialize, Serialize};
use crate::movie::Movie;

/// Review metadata shown next to a movie in the browsing view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReviewSummary {
    pub review_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_snippet: Option<String>, // Absent when review_count is 0
}

/// A projected movie plus its review metadata, ready for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    pub movie: Movie,
    #[serde(flatten)]
    pub reviews: ReviewSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewedMovie {
    pub title: String,
    pub review_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentReview {
    pub movie_title: String,
    pub text: String,
    pub date: String,
}

/// Catalog-wide numbers for the administrative dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total_movies: u64,
    pub total_reviews: u64,
    pub watched_movies: u64,
    pub favorite_movies: u64,
    pub top_rated_movies: Vec<ReviewedMovie>,
    pub recent_reviews: Vec<RecentReview>,
}
