use marquee_models::{Movie, MovieCard, ReviewSummary};
use serde::Serialize;

use crate::enrichment::EnrichmentBatch;
use crate::filter::{project, ViewQuery};

pub const NO_MATCHES: &str = "No movies found matching your criteria";
pub const NO_MOVIES: &str = "No movies available";

/// What the browsing view renders for one query
#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub query: ViewQuery,
    pub cards: Vec<MovieCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    pub enrichment_failures: usize,
}

/// Project `movies` through `query` and attach review summaries from `batch`.
///
/// Without a batch every card shows zero reviews.
pub fn build_page(movies: &[Movie], query: &ViewQuery, batch: Option<&EnrichmentBatch>) -> BrowsePage {
    let visible = project(movies, query);

    let empty_message = if !visible.is_empty() {
        None
    } else if query.is_narrowed() {
        Some(NO_MATCHES)
    } else {
        Some(NO_MOVIES)
    };

    let cards = visible
        .into_iter()
        .map(|movie| {
            let reviews = batch
                .map(|b| b.summary_for(&movie.id))
                .unwrap_or_else(ReviewSummary::default);
            MovieCard { movie, reviews }
        })
        .collect();

    BrowsePage {
        query: query.clone(),
        cards,
        empty_message,
        enrichment_failures: batch.map_or(0, |b| b.failures.len()),
    }
}
