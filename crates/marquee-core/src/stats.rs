use chrono::{DateTime, Local, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use marquee_config::Config;
use marquee_models::{CatalogStats, Movie, RecentReview, Review, ReviewedMovie};
use marquee_store::DataStore;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct StatsOptions {
    pub top_count: usize,
    pub recent_count: usize,
    pub date_format: String,
    pub unknown_title: String,
    pub concurrency: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            top_count: 5,
            recent_count: 5,
            date_format: "%-m/%-d/%Y".to_string(),
            unknown_title: "Unknown".to_string(),
            concurrency: 8,
        }
    }
}

impl StatsOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            top_count: config.dashboard.top_count,
            recent_count: config.dashboard.recent_count,
            date_format: config.dashboard.date_format.clone(),
            unknown_title: config.dashboard.unknown_title.clone(),
            concurrency: config.enrichment.concurrency.max(1),
        }
    }
}

/// Dashboard statistics over `movies` and the store's reviews.
///
/// All or nothing: if any query fails the dashboard gets an error,
/// never a partially filled result.
pub async fn load_catalog_stats(
    store: &dyn DataStore,
    movies: &[Movie],
    options: &StatsOptions,
) -> Result<CatalogStats, CoreError> {
    let total_reviews = store
        .count_reviews(None)
        .await
        .map_err(CoreError::Aggregation)?;

    // buffered keeps results aligned with `movies`
    let counts: Vec<u64> = stream::iter(movies)
        .map(|m| store.count_reviews(Some(m.id.as_str())))
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await
        .map_err(CoreError::Aggregation)?;

    let latest = store
        .latest_reviews(None, options.recent_count)
        .await
        .map_err(CoreError::Aggregation)?;

    debug!(
        "Computed dashboard stats: {} movies, {} reviews",
        movies.len(),
        total_reviews
    );

    Ok(CatalogStats {
        total_movies: movies.len() as u64,
        total_reviews,
        watched_movies: movies.iter().filter(|m| m.watched).count() as u64,
        favorite_movies: movies.iter().filter(|m| m.favorite).count() as u64,
        top_rated_movies: top_reviewed(movies, &counts, options.top_count),
        recent_reviews: annotate_recent(&latest, movies, options),
    })
}

/// The `limit` movies with the most reviews, most first.
/// Movies without reviews are left out; equal counts keep collection order.
pub fn top_reviewed(movies: &[Movie], counts: &[u64], limit: usize) -> Vec<ReviewedMovie> {
    let mut ranked: Vec<(&Movie, u64)> = movies
        .iter()
        .zip(counts.iter().copied())
        .filter(|(_, count)| *count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(limit)
        .map(|(movie, review_count)| ReviewedMovie {
            title: movie.title.clone(),
            review_count,
        })
        .collect()
}

/// Attach the parent movie's title and a display date to each review
pub fn annotate_recent(reviews: &[Review], movies: &[Movie], options: &StatsOptions) -> Vec<RecentReview> {
    let titles: HashMap<&str, &str> = movies
        .iter()
        .map(|m| (m.id.as_str(), m.title.as_str()))
        .collect();

    reviews
        .iter()
        .map(|review| RecentReview {
            movie_title: titles
                .get(review.movie_id.as_str())
                .map(|title| title.to_string())
                .unwrap_or_else(|| options.unknown_title.clone()),
            text: review.text.clone(),
            date: format_date(&review.created_at, &options.date_format),
        })
        .collect()
}

/// Local calendar date of `timestamp`; falls back to ISO format if `format` is invalid
pub fn format_date(timestamp: &DateTime<Utc>, format: &str) -> String {
    let local = timestamp.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return local.date_naive().to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flagged, movie, review};
    use marquee_store::{MemoryStore, StoreError, StoreOp};

    fn seeded() -> MemoryStore {
        let movies = vec![
            flagged(movie("m1", "Ran", 1985, 1), true, true),
            flagged(movie("m2", "Ikiru", 1952, 2), true, false),
            movie("m3", "Rashomon", 1950, 3),
            movie("m4", "Dersu Uzala", 1975, 4),
        ];
        let reviews = vec![
            review("r1", "m2", "Quiet", 50),
            review("r2", "m2", "Moving", 40),
            review("r3", "m3", "Layered", 30),
            review("r4", "m1", "Epic", 20),
            review("r5", "gone", "Orphaned note", 10),
        ];
        MemoryStore::with_data(movies, reviews)
    }

    #[tokio::test]
    async fn test_load_catalog_stats() {
        let store = seeded();
        let movies = store.snapshot().movies;
        let options = StatsOptions {
            recent_count: 3,
            ..StatsOptions::default()
        };

        let stats = load_catalog_stats(&store, &movies, &options).await.unwrap();
        assert_eq!(stats.total_movies, 4);
        assert_eq!(stats.total_reviews, 5);
        assert_eq!(stats.watched_movies, 2);
        assert_eq!(stats.favorite_movies, 1);

        let top: Vec<(&str, u64)> = stats
            .top_rated_movies
            .iter()
            .map(|m| (m.title.as_str(), m.review_count))
            .collect();
        assert_eq!(top, vec![("Ikiru", 2), ("Ran", 1), ("Rashomon", 1)]);

        let recent: Vec<(&str, &str)> = stats
            .recent_reviews
            .iter()
            .map(|r| (r.movie_title.as_str(), r.text.as_str()))
            .collect();
        assert_eq!(
            recent,
            vec![("Unknown", "Orphaned note"), ("Ran", "Epic"), ("Rashomon", "Layered")]
        );
    }

    #[tokio::test]
    async fn test_any_failure_fails_whole_dashboard() {
        let store = seeded();
        let movies = store.snapshot().movies;
        store.fail_for_movie(StoreOp::CountReviews, "m3");

        let result = load_catalog_stats(&store, &movies, &StatsOptions::default()).await;
        assert!(matches!(
            result,
            Err(CoreError::Aggregation(StoreError::Injected(StoreOp::CountReviews)))
        ));
    }

    #[test]
    fn test_top_reviewed_limits_and_keeps_order_on_ties() {
        let movies: Vec<Movie> = (0..7)
            .map(|i| movie(&format!("m{}", i), &format!("Film {}", i), 2000 + i, i as i64))
            .collect();
        let counts = [1, 3, 0, 3, 1, 2, 1];

        let top = top_reviewed(&movies, &counts, 5);
        let titles: Vec<&str> = top.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Film 1", "Film 3", "Film 5", "Film 0", "Film 4"]);
    }

    #[test]
    fn test_top_reviewed_skips_unreviewed() {
        let movies = vec![movie("a", "A", 2000, 0)];
        assert!(top_reviewed(&movies, &[0], 5).is_empty());
    }

    #[test]
    fn test_format_date() {
        let ts = crate::test_support::base_time();
        let expected = ts.with_timezone(&Local).format("%-m/%-d/%Y").to_string();
        assert_eq!(format_date(&ts, "%-m/%-d/%Y"), expected);

        let fallback = format_date(&ts, "%Q");
        assert_eq!(fallback, ts.with_timezone(&Local).date_naive().to_string());
    }
}
