pub mod error;
pub mod validation;
pub mod filter;
pub mod enrichment;
pub mod stats;
pub mod movies;
pub mod reviews;
pub mod browse;

#[cfg(test)]
mod test_support;

pub use error::{CoreError, ValidationError};
pub use validation::{validate_draft, validate_review};
pub use filter::{project, ViewQuery};
pub use enrichment::{EnrichmentBatch, EnrichmentFailure, ReviewEnricher};
pub use stats::{load_catalog_stats, StatsOptions};
pub use movies::MovieRepository;
pub use reviews::ReviewRepository;
pub use browse::{build_page, BrowsePage};
