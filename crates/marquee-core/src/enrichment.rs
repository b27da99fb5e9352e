use futures::stream::{self, StreamExt};
use marquee_config::EnrichmentConfig;
use marquee_models::{Movie, ReviewSummary};
use marquee_store::{DataStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A movie whose review summary could not be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub movie_id: String,
    pub message: String,
}

/// Review summaries for one movie set, tagged with the generation that requested them
#[derive(Debug, Clone, Default)]
pub struct EnrichmentBatch {
    pub generation: u64,
    pub summaries: HashMap<String, ReviewSummary>,
    pub failures: Vec<EnrichmentFailure>,
}

impl EnrichmentBatch {
    /// Summary for `movie_id`, or zero reviews when it was not enriched or failed
    pub fn summary_for(&self, movie_id: &str) -> ReviewSummary {
        self.summaries.get(movie_id).cloned().unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes review counts and snippets for the movies being browsed.
///
/// Each call to [`ReviewEnricher::enrich`] starts a new generation. A batch
/// that finishes after a newer one was started is stale and is refused by
/// [`ReviewEnricher::accept`].
pub struct ReviewEnricher {
    store: Arc<dyn DataStore>,
    concurrency: usize,
    generation: AtomicU64,
}

impl ReviewEnricher {
    pub fn new(store: Arc<dyn DataStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(store: Arc<dyn DataStore>, config: &EnrichmentConfig) -> Self {
        Self::new(store, config.concurrency)
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Query every movie's review summary, at most `concurrency` movies at a time.
    ///
    /// Per-movie failures never fail the batch: the movie falls back to zero
    /// reviews and the failure is recorded on the batch.
    pub async fn enrich(&self, movies: &[Movie]) -> EnrichmentBatch {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.store.as_ref();
        debug!(
            "Enriching {} movies (generation {}, concurrency {})",
            movies.len(),
            generation,
            self.concurrency
        );

        let results: Vec<(String, Result<ReviewSummary, StoreError>)> =
            stream::iter(movies.iter().map(|m| m.id.clone()))
                .map(move |id| async move {
                    let result = summarize(store, &id).await;
                    (id, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut batch = EnrichmentBatch {
            generation,
            ..EnrichmentBatch::default()
        };
        for (movie_id, result) in results {
            match result {
                Ok(summary) => {
                    batch.summaries.insert(movie_id, summary);
                }
                Err(e) => {
                    warn!("Failed to load reviews for movie {}: {}", movie_id, e);
                    batch.summaries.insert(movie_id.clone(), ReviewSummary::default());
                    batch.failures.push(EnrichmentFailure {
                        movie_id,
                        message: e.to_string(),
                    });
                }
            }
        }
        batch
    }

    /// Pass `batch` through if no newer enrichment was started since it began
    pub fn accept(&self, batch: EnrichmentBatch) -> Option<EnrichmentBatch> {
        let current = self.current_generation();
        if batch.generation == current {
            Some(batch)
        } else {
            debug!(
                "Discarding stale enrichment batch (generation {}, current {})",
                batch.generation, current
            );
            None
        }
    }
}

/// Review count for one movie plus its newest review's text.
/// The snippet query is skipped when the movie has no reviews.
pub async fn summarize(store: &dyn DataStore, movie_id: &str) -> Result<ReviewSummary, StoreError> {
    let review_count = store.count_reviews(Some(movie_id)).await?;
    if review_count == 0 {
        return Ok(ReviewSummary::default());
    }

    let latest = store.latest_reviews(Some(movie_id), 1).await?;
    Ok(ReviewSummary {
        review_count,
        review_snippet: latest.into_iter().next().map(|r| r.text),
    })
}
