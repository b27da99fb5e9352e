use marquee_models::{Movie, NewReview, Review};
use marquee_store::DataStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::validation::validate_review;

/// Per-movie review lists backed by a [`DataStore`]
pub struct ReviewRepository {
    store: Arc<dyn DataStore>,
    by_movie: HashMap<String, Vec<Review>>,
}

impl ReviewRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            by_movie: HashMap::new(),
        }
    }

    /// Load the reviews of one movie, newest first, replacing its cached list
    pub async fn fetch_for_movie(&mut self, movie_id: &str) -> Result<&[Review], CoreError> {
        let reviews = self
            .store
            .list_reviews(movie_id)
            .await
            .map_err(|source| CoreError::Fetch { what: "reviews", source })?;
        debug!("Loaded {} reviews for movie {}", reviews.len(), movie_id);
        let cached = self.by_movie.entry(movie_id.to_string()).or_default();
        *cached = reviews;
        Ok(cached.as_slice())
    }

    pub fn cached(&self, movie_id: &str) -> Option<&[Review]> {
        self.by_movie.get(movie_id).map(Vec::as_slice)
    }

    /// Post a review for `movie`.
    ///
    /// Text must be non-blank and the movie must be marked watched; both are
    /// checked before the store is called. The confirmed review is prepended
    /// to the movie's cached list if one was loaded.
    pub async fn add(&mut self, movie: &Movie, text: &str, spoiler: bool) -> Result<Review, CoreError> {
        let text = validate_review(movie, text)?;
        let review = self
            .store
            .insert_review(&NewReview {
                movie_id: movie.id.clone(),
                text,
                spoiler,
            })
            .await
            .map_err(|source| CoreError::Mutation {
                action: "post review",
                source,
            })?;

        if let Some(list) = self.by_movie.get_mut(&movie.id) {
            list.insert(0, review.clone());
        }
        info!("Posted review {} on movie {}", review.id, movie.id);
        Ok(review)
    }

    /// Drop the cached list of a movie, e.g. after it was deleted
    pub fn forget(&mut self, movie_id: &str) {
        self.by_movie.remove(movie_id);
    }
}
