//! Builds the configured `DataStore` implementation.
use anyhow::Result;
use marquee_config::{Config, CredentialStore, StoreBackend, API_KEY_ENV};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::memory::MemoryStore;
use crate::rest::RestStore;
use crate::traits::DataStore;

pub fn create_store(config: &Config, credentials: &CredentialStore) -> Result<Arc<dyn DataStore>> {
    match config.store.backend {
        StoreBackend::Rest => {
            let api_key = credentials.resolve_store_api_key().ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key for the data store. Run 'marquee config api-key' or set {}",
                    API_KEY_ENV
                )
            })?;
            let store = RestStore::new(
                &config.store.url,
                &api_key,
                Duration::from_secs(config.store.timeout_seconds),
            )?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = match &config.store.seed_file {
                Some(path) => MemoryStore::from_seed_file(path)?,
                None => MemoryStore::new(),
            };
            info!("Using in-process data store");
            Ok(Arc::new(store))
        }
    }
}
