pub mod admin;
pub mod browse;
pub mod config;
pub mod mark;
pub mod progress;
pub mod prompts;
pub mod review;
pub mod show;

use color_eyre::Result;
use marquee_config::{Config, CredentialStore, PathManager, StoreBackend};
use marquee_store::{create_store, DataStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Loaded configuration plus the data store it points at
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn DataStore>,
}

impl AppContext {
    /// Load config and credentials, apply command-line overrides and open the store
    pub fn load(backend: Option<StoreBackend>, seed: Option<PathBuf>) -> Result<Self> {
        let path_manager = PathManager::default();
        let config_file = path_manager.config_file();
        let mut config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        apply_overrides(&mut config, backend, seed);
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

        let credentials_file = path_manager.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials.load().map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e)
        })?;

        let store = create_store(&config, &credentials).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        tracing::debug!("Using {} data store", store.store_name());

        Ok(Self { config, store })
    }
}

/// `--seed` implies the memory backend
fn apply_overrides(config: &mut Config, backend: Option<StoreBackend>, seed: Option<PathBuf>) {
    if let Some(seed) = seed {
        config.store.backend = StoreBackend::Memory;
        config.store.seed_file = Some(seed);
    }
    if let Some(backend) = backend {
        config.store.backend = backend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_implies_memory_backend() {
        let mut config = Config::default();
        apply_overrides(&mut config, None, Some(PathBuf::from("movies.json")));
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.seed_file, Some(PathBuf::from("movies.json")));
    }

    #[test]
    fn test_backend_flag_overrides_file() {
        let mut config = Config::default();
        apply_overrides(&mut config, Some(StoreBackend::Memory), None);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.seed_file.is_none());
    }
}
