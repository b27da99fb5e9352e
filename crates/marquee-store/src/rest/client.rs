use async_trait::async_trait;
use marquee_models::{Movie, MovieDraft, MovieFlag, NewReview, Review};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::StoreError;
use crate::rest::api::{self, Endpoint};
use crate::traits::DataStore;

/// `DataStore` backed by a hosted Postgres exposed through PostgREST
#[derive(Clone)]
pub struct RestStore {
    client: Arc<Client>,
    endpoint: Endpoint,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("Using REST data store at {}", base_url);
        Ok(Self {
            client: Arc::new(client),
            endpoint: Endpoint::new(base_url, api_key),
        })
    }
}

#[async_trait]
impl DataStore for RestStore {
    fn store_name(&self) -> &str {
        "rest"
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        api::list_movies(&self.client, &self.endpoint).await
    }

    async fn insert_movie(&self, draft: &MovieDraft) -> Result<Movie, StoreError> {
        api::insert_movie(&self.client, &self.endpoint, draft).await
    }

    async fn update_movie(&self, id: &str, draft: &MovieDraft) -> Result<(), StoreError> {
        api::update_movie(&self.client, &self.endpoint, id, draft).await
    }

    async fn set_movie_flag(&self, id: &str, flag: MovieFlag, value: bool) -> Result<(), StoreError> {
        api::set_movie_flag(&self.client, &self.endpoint, id, flag, value).await
    }

    async fn delete_movie(&self, id: &str) -> Result<(), StoreError> {
        api::delete_movie(&self.client, &self.endpoint, id).await
    }

    async fn list_reviews(&self, movie_id: &str) -> Result<Vec<Review>, StoreError> {
        api::list_reviews(&self.client, &self.endpoint, movie_id).await
    }

    async fn count_reviews(&self, movie_id: Option<&str>) -> Result<u64, StoreError> {
        api::count_reviews(&self.client, &self.endpoint, movie_id).await
    }

    async fn latest_reviews(&self, movie_id: Option<&str>, limit: usize) -> Result<Vec<Review>, StoreError> {
        api::latest_reviews(&self.client, &self.endpoint, movie_id, limit).await
    }

    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        api::insert_review(&self.client, &self.endpoint, review).await
    }
}
