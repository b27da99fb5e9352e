use marquee_models::{Movie, MovieDraft, MovieFlag};
use marquee_store::DataStore;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::validation::validate_draft;

/// Cached movie collection backed by a [`DataStore`].
///
/// The cache only changes after the store has confirmed a write. Flag
/// toggles are applied to the cache directly; after `create`, `update` or
/// `delete` the caller is expected to `fetch_all` again.
pub struct MovieRepository {
    store: Arc<dyn DataStore>,
    movies: Vec<Movie>,
    loaded: bool,
}

impl MovieRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            movies: Vec::new(),
            loaded: false,
        }
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Reload the collection, newest first. On failure the cache is kept.
    pub async fn fetch_all(&mut self) -> Result<&[Movie], CoreError> {
        let movies = self
            .store
            .list_movies()
            .await
            .map_err(|source| CoreError::Fetch { what: "movies", source })?;
        debug!("Loaded {} movies from {}", movies.len(), self.store.store_name());
        self.movies = movies;
        self.loaded = true;
        Ok(&self.movies)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub async fn set_watched(&mut self, id: &str, watched: bool) -> Result<(), CoreError> {
        self.set_flag(id, MovieFlag::Watched, watched).await
    }

    pub async fn set_favorite(&mut self, id: &str, favorite: bool) -> Result<(), CoreError> {
        self.set_flag(id, MovieFlag::Favorite, favorite).await
    }

    async fn set_flag(&mut self, id: &str, flag: MovieFlag, value: bool) -> Result<(), CoreError> {
        self.store
            .set_movie_flag(id, flag, value)
            .await
            .map_err(|source| CoreError::Mutation {
                action: "update movie",
                source,
            })?;
        self.movies = apply_flag(&self.movies, id, flag, value);
        info!("Set {} = {} on movie {}", flag.column(), value, id);
        Ok(())
    }

    /// Insert a new, unflagged movie after validating the form
    pub async fn create(&self, draft: &MovieDraft) -> Result<Movie, CoreError> {
        let draft = validate_draft(draft)?;
        let movie = self
            .store
            .insert_movie(&draft)
            .await
            .map_err(|source| CoreError::Mutation {
                action: "add movie",
                source,
            })?;
        info!("Added movie {} ({})", movie.title, movie.id);
        Ok(movie)
    }

    pub async fn update(&self, id: &str, draft: &MovieDraft) -> Result<(), CoreError> {
        let draft = validate_draft(draft)?;
        self.store
            .update_movie(id, &draft)
            .await
            .map_err(|source| CoreError::Mutation {
                action: "update movie",
                source,
            })?;
        info!("Updated movie {}", id);
        Ok(())
    }

    /// Delete a movie; the store removes its reviews with it
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.store
            .delete_movie(id)
            .await
            .map_err(|source| CoreError::Mutation {
                action: "delete movie",
                source,
            })?;
        info!("Deleted movie {}", id);
        Ok(())
    }
}

/// Copy of `movies` with `flag` set to `value` on the movie with `id`
pub fn apply_flag(movies: &[Movie], id: &str, flag: MovieFlag, value: bool) -> Vec<Movie> {
    movies
        .iter()
        .map(|m| {
            let mut m = m.clone();
            if m.id == id {
                m.set_flag(flag, value);
            }
            m
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::test_support::{ids, movie, review};
    use marquee_store::{MemoryStore, StoreError, StoreOp};

    fn setup() -> (Arc<MemoryStore>, MovieRepository) {
        let store = Arc::new(MemoryStore::with_data(
            vec![
                movie("old", "Metropolis", 1927, 10),
                movie("new", "Arrival", 2016, 1),
            ],
            vec![review("r1", "old", "Still holds up", 5)],
        ));
        let repo = MovieRepository::new(store.clone());
        (store, repo)
    }

    fn draft(title: &str) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            year: 2021,
            poster: "https://example.com/p.jpg".to_string(),
            genres: vec!["Drama".to_string()],
            director: "Someone".to_string(),
            cast_members: vec!["Actor".to_string()],
            country: "Chile".to_string(),
            language: "Spanish".to_string(),
            synopsis: "Plot.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_newest_first() {
        let (_, mut repo) = setup();
        assert!(!repo.is_loaded());
        let movies = repo.fetch_all().await.unwrap();
        assert_eq!(ids(movies), vec!["new", "old"]);
        assert!(repo.is_loaded());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_cache_and_blocks() {
        let (store, mut repo) = setup();
        repo.fetch_all().await.unwrap();
        store.fail_next(StoreOp::ListMovies);

        let err = repo.fetch_all().await.unwrap_err();
        assert!(err.is_blocking());
        assert_eq!(repo.movies().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_updates_store_then_cache() {
        let (store, mut repo) = setup();
        repo.fetch_all().await.unwrap();

        repo.set_watched("old", true).await.unwrap();
        repo.set_favorite("new", true).await.unwrap();

        assert!(repo.get("old").unwrap().watched);
        assert!(repo.get("new").unwrap().favorite);
        let stored = store.snapshot().movies;
        assert!(stored.iter().any(|m| m.id == "old" && m.watched));
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_cache_unchanged() {
        let (store, mut repo) = setup();
        repo.fetch_all().await.unwrap();
        let before = repo.movies().to_vec();
        store.fail_next(StoreOp::SetMovieFlag);

        let err = repo.set_favorite("old", true).await.unwrap_err();
        assert!(matches!(err, CoreError::Mutation { .. }));
        assert!(!err.is_blocking());
        assert_eq!(repo.movies(), &before[..]);
        assert_eq!(store.calls_of(StoreOp::SetMovieFlag).len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_refetch() {
        let (_, mut repo) = setup();
        repo.fetch_all().await.unwrap();

        let created = repo.create(&draft("  No ")).await.unwrap();
        assert_eq!(created.title, "No");
        assert!(!created.watched && !created.favorite);
        assert_eq!(repo.movies().len(), 2);

        let movies = repo.fetch_all().await.unwrap();
        assert_eq!(movies[0].id, created.id);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let (store, repo) = setup();
        let mut bad = draft("Untitled");
        bad.synopsis.clear();

        let err = repo.create(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingField("synopsis"))
        ));
        let err = repo.update("old", &bad).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_flags() {
        let (store, mut repo) = setup();
        repo.fetch_all().await.unwrap();
        repo.set_watched("old", true).await.unwrap();

        repo.update("old", &draft("Metropolis (restored)")).await.unwrap();
        let movies = repo.fetch_all().await.unwrap();
        let updated = movies.iter().find(|m| m.id == "old").unwrap();
        assert_eq!(updated.title, "Metropolis (restored)");
        assert!(updated.watched);
        assert_eq!(store.calls_of(StoreOp::UpdateMovie).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_reviews() {
        let (store, mut repo) = setup();
        repo.delete("old").await.unwrap();

        let snapshot = store.snapshot();
        assert!(snapshot.reviews.is_empty());
        assert_eq!(ids(repo.fetch_all().await.unwrap()), vec!["new"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_movie_is_mutation_failure() {
        let (_, repo) = setup();
        let err = repo.delete("missing").await.unwrap_err();
        match err {
            CoreError::Mutation { source, .. } => {
                assert!(matches!(source, StoreError::NotFound { .. }))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_apply_flag_is_pure() {
        let movies = vec![movie("a", "A", 2000, 0), movie("b", "B", 2001, 1)];
        let next = apply_flag(&movies, "b", MovieFlag::Watched, true);
        assert!(!movies[1].watched);
        assert!(next[1].watched);
        assert!(!next[0].watched);
    }
}
