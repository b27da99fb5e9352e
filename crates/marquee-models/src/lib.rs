pub mod movie;
pub mod review;
pub mod selectors;
pub mod stats;

pub use movie::{split_list, Movie, MovieDraft, MovieFlag};
pub use review::{NewReview, Review};
pub use selectors::{FilterBy, SortBy};
pub use stats::{CatalogStats, MovieCard, RecentReview, ReviewSummary, ReviewedMovie};
