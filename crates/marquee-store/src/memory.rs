use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use marquee_models::{Movie, MovieDraft, MovieFlag, NewReview, Review};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::{DataStore, StoreOp};

/// Contents of a JSON seed file for the in-process store
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Seed {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// One recorded call against a `MemoryStore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub movie_id: Option<String>,
}

#[derive(Default)]
struct Tables {
    movies: Vec<Movie>,
    reviews: Vec<Review>,
    last_created: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Faults {
    next: HashSet<StoreOp>,
    per_movie: HashSet<(StoreOp, String)>,
}

/// In-process implementation of the `movies`/`reviews` schema.
///
/// Behaves like the hosted store: rows come back ordered by `created_at`
/// descending, deleting a movie cascades to its reviews, and inserting a
/// review for an unknown movie is a foreign-key failure. Calls are recorded
/// and failures can be injected per operation.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<StoreCall>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(movies: Vec<Movie>, reviews: Vec<Review>) -> Self {
        let last_created = movies
            .iter()
            .map(|m| m.created_at)
            .chain(reviews.iter().map(|r| r.created_at))
            .max();
        Self {
            tables: Mutex::new(Tables {
                movies,
                reviews,
                last_created,
            }),
            ..Self::default()
        }
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self::with_data(seed.movies, seed.reviews)
    }

    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&content)?;
        debug!(
            "Loaded seed file {} ({} movies, {} reviews)",
            path.display(),
            seed.movies.len(),
            seed.reviews.len()
        );
        Ok(Self::from_seed(seed))
    }

    /// Delay every call by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call of `op` fail, once
    pub fn fail_next(&self, op: StoreOp) {
        self.faults.lock().unwrap_or_else(|e| e.into_inner()).next.insert(op);
    }

    /// Make every call of `op` concerning `movie_id` fail
    pub fn fail_for_movie(&self, op: StoreOp, movie_id: &str) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .per_movie
            .insert((op, movie_id.to_string()));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.calls().into_iter().filter(|c| c.op == op).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn snapshot(&self) -> Seed {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        Seed {
            movies: tables.movies.clone(),
            reviews: tables.reviews.clone(),
        }
    }

    async fn enter(&self, op: StoreOp, movie_id: Option<&str>) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(StoreCall {
                op,
                movie_id: movie_id.map(str::to_string),
            });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut faults = self.faults.lock().unwrap_or_else(|e| e.into_inner());
        if faults.next.remove(&op) {
            return Err(StoreError::Injected(op));
        }
        if let Some(id) = movie_id {
            if faults.per_movie.contains(&(op, id.to_string())) {
                return Err(StoreError::Injected(op));
            }
        }
        Ok(())
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Tables {
    /// Strictly increasing creation timestamps, so ordering is never ambiguous
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created {
            Some(last) if now <= last => last + ChronoDuration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(ts);
        ts
    }

    fn movie_mut(&mut self, id: &str) -> Result<&mut Movie, StoreError> {
        self.movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "movie",
                id: id.to_string(),
            })
    }

    fn reviews_newest_first(&self, movie_id: Option<&str>) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| movie_id.map_or(true, |id| r.movie_id == id))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.enter(StoreOp::ListMovies, None).await?;
        let mut movies = self.lock_tables().movies.clone();
        movies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(movies)
    }

    async fn insert_movie(&self, draft: &MovieDraft) -> Result<Movie, StoreError> {
        self.enter(StoreOp::InsertMovie, None).await?;
        let mut tables = self.lock_tables();
        let movie = Movie {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            year: draft.year,
            poster: draft.poster.clone(),
            genres: draft.genres.clone(),
            director: draft.director.clone(),
            cast_members: draft.cast_members.clone(),
            country: draft.country.clone(),
            language: draft.language.clone(),
            synopsis: draft.synopsis.clone(),
            watched: false,
            favorite: false,
            created_at: tables.next_created_at(),
        };
        tables.movies.push(movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: &str, draft: &MovieDraft) -> Result<(), StoreError> {
        self.enter(StoreOp::UpdateMovie, Some(id)).await?;
        let mut tables = self.lock_tables();
        let movie = tables.movie_mut(id)?;
        movie.title = draft.title.clone();
        movie.year = draft.year;
        movie.poster = draft.poster.clone();
        movie.genres = draft.genres.clone();
        movie.director = draft.director.clone();
        movie.cast_members = draft.cast_members.clone();
        movie.country = draft.country.clone();
        movie.language = draft.language.clone();
        movie.synopsis = draft.synopsis.clone();
        Ok(())
    }

    async fn set_movie_flag(&self, id: &str, flag: MovieFlag, value: bool) -> Result<(), StoreError> {
        self.enter(StoreOp::SetMovieFlag, Some(id)).await?;
        self.lock_tables().movie_mut(id)?.set_flag(flag, value);
        Ok(())
    }

    async fn delete_movie(&self, id: &str) -> Result<(), StoreError> {
        self.enter(StoreOp::DeleteMovie, Some(id)).await?;
        let mut tables = self.lock_tables();
        let before = tables.movies.len();
        tables.movies.retain(|m| m.id != id);
        if tables.movies.len() == before {
            return Err(StoreError::NotFound {
                entity: "movie",
                id: id.to_string(),
            });
        }
        // ON DELETE CASCADE
        tables.reviews.retain(|r| r.movie_id != id);
        Ok(())
    }

    async fn list_reviews(&self, movie_id: &str) -> Result<Vec<Review>, StoreError> {
        self.enter(StoreOp::ListReviews, Some(movie_id)).await?;
        Ok(self.lock_tables().reviews_newest_first(Some(movie_id)))
    }

    async fn count_reviews(&self, movie_id: Option<&str>) -> Result<u64, StoreError> {
        self.enter(StoreOp::CountReviews, movie_id).await?;
        let tables = self.lock_tables();
        let count = tables
            .reviews
            .iter()
            .filter(|r| movie_id.map_or(true, |id| r.movie_id == id))
            .count();
        Ok(count as u64)
    }

    async fn latest_reviews(&self, movie_id: Option<&str>, limit: usize) -> Result<Vec<Review>, StoreError> {
        self.enter(StoreOp::LatestReviews, movie_id).await?;
        let mut reviews = self.lock_tables().reviews_newest_first(movie_id);
        reviews.truncate(limit);
        Ok(reviews)
    }

    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        self.enter(StoreOp::InsertReview, Some(&review.movie_id)).await?;
        let mut tables = self.lock_tables();
        if !tables.movies.iter().any(|m| m.id == review.movie_id) {
            return Err(StoreError::NotFound {
                entity: "movie",
                id: review.movie_id.clone(),
            });
        }
        let created = Review {
            id: Uuid::new_v4().to_string(),
            movie_id: review.movie_id.clone(),
            text: review.text.clone(),
            spoiler: review.spoiler,
            created_at: tables.next_created_at(),
        };
        tables.reviews.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn draft(title: &str, year: i32) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            year,
            poster: "https://example.com/p.jpg".to_string(),
            genres: vec!["Drama".to_string()],
            director: "Someone".to_string(),
            cast_members: vec!["Actor".to_string()],
            country: "France".to_string(),
            language: "French".to_string(),
            synopsis: "Things happen.".to_string(),
        }
    }

    fn new_review(movie_id: &str, text: &str) -> NewReview {
        NewReview {
            movie_id: movie_id.to_string(),
            text: text.to_string(),
            spoiler: false,
        }
    }

    #[tokio::test]
    async fn test_insert_movie_starts_unflagged_and_lists_newest_first() {
        let store = MemoryStore::new();
        let first = store.insert_movie(&draft("First", 1990)).await.unwrap();
        let second = store.insert_movie(&draft("Second", 2000)).await.unwrap();

        assert!(!first.watched && !first.favorite);
        assert!(second.created_at > first.created_at);

        let movies = store.list_movies().await.unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_update_movie_keeps_flags() {
        let store = MemoryStore::new();
        let movie = store.insert_movie(&draft("Old", 1990)).await.unwrap();
        store.set_movie_flag(&movie.id, MovieFlag::Favorite, true).await.unwrap();
        store.update_movie(&movie.id, &draft("New", 1991)).await.unwrap();

        let stored = &store.list_movies().await.unwrap()[0];
        assert_eq!(stored.title, "New");
        assert_eq!(stored.year, 1991);
        assert!(stored.favorite);
        assert_eq!(stored.created_at, movie.created_at);
    }

    #[tokio::test]
    async fn test_delete_movie_cascades_to_reviews() {
        let store = MemoryStore::new();
        let keep = store.insert_movie(&draft("Keep", 1990)).await.unwrap();
        let gone = store.insert_movie(&draft("Gone", 1991)).await.unwrap();
        store.insert_review(&new_review(&keep.id, "fine")).await.unwrap();
        store.insert_review(&new_review(&gone.id, "bye")).await.unwrap();
        store.insert_review(&new_review(&gone.id, "bye again")).await.unwrap();

        store.delete_movie(&gone.id).await.unwrap();

        assert_eq!(store.count_reviews(None).await.unwrap(), 1);
        assert_eq!(store.count_reviews(Some(&gone.id)).await.unwrap(), 0);
        assert!(store.delete_movie(&gone.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_review_requires_existing_movie() {
        let store = MemoryStore::new();
        let err = store.insert_review(&new_review("missing", "text")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_latest_reviews_are_newest_first_and_limited() {
        let store = MemoryStore::new();
        let movie = store.insert_movie(&draft("M", 2001)).await.unwrap();
        for i in 0..4 {
            store.insert_review(&new_review(&movie.id, &format!("r{}", i))).await.unwrap();
        }

        let latest = store.latest_reviews(Some(&movie.id), 2).await.unwrap();
        let texts: Vec<&str> = latest.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["r3", "r2"]);

        let all = store.list_reviews(&movie.id).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].text, "r3");
    }

    #[tokio::test]
    async fn test_fault_injection_and_call_log() {
        let store = MemoryStore::new();
        store.fail_next(StoreOp::ListMovies);

        assert!(matches!(
            store.list_movies().await,
            Err(StoreError::Injected(StoreOp::ListMovies))
        ));
        assert!(store.list_movies().await.is_ok());

        store.fail_for_movie(StoreOp::CountReviews, "m1");
        assert!(store.count_reviews(Some("m1")).await.is_err());
        assert!(store.count_reviews(Some("m2")).await.is_ok());

        assert_eq!(store.calls_of(StoreOp::ListMovies).len(), 2);
        assert_eq!(
            store.calls_of(StoreOp::CountReviews)[1].movie_id.as_deref(),
            Some("m2")
        );
    }

    #[tokio::test]
    async fn test_seed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"movies": [{{"id": "m1", "title": "Seeded", "year": 1968, "poster": "",
                "genres": ["Sci-Fi"], "director": "", "cast_members": [], "country": "UK",
                "language": "English", "synopsis": "", "watched": true, "favorite": false,
                "created_at": "2024-01-01T00:00:00Z"}}],
               "reviews": [{{"id": "r1", "movie_id": "m1", "text": "Monolith!", "spoiler": false,
                "created_at": "2024-01-02T00:00:00Z"}}]}}"#
        )
        .unwrap();

        let store = MemoryStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.list_movies().await.unwrap()[0].title, "Seeded");

        let review = store.insert_review(&new_review("m1", "again")).await.unwrap();
        assert!(review.created_at > "2024-01-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }
}
