pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{BrowseConfig, Config, DashboardConfig, EnrichmentConfig, StoreBackend, StoreConfig, API_KEY_ENV};
pub use credentials::CredentialStore;
pub use paths::{base_path_override, PathManager};
