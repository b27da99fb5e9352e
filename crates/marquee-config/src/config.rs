use marquee_models::{FilterBy, SortBy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the stored API key
pub const API_KEY_ENV: &str = "MARQUEE_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted Postgres behind a PostgREST endpoint
    #[default]
    Rest,
    /// In-process store, optionally seeded from a JSON file
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}. Use 'rest' or 'memory'", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BrowseConfig {
    #[serde(default)]
    pub sort: SortBy,
    #[serde(default)]
    pub filter: FilterBy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    // Number of per-movie review queries in flight at once; 1 = one after another
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_top_count")]
    pub top_count: usize,
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_unknown_title")]
    pub unknown_title: String,
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_concurrency() -> usize {
    8
}

fn default_top_count() -> usize {
    5
}

fn default_recent_count() -> usize {
    5
}

fn default_date_format() -> String {
    "%-m/%-d/%Y".to_string()
}

fn default_unknown_title() -> String {
    "Unknown".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            seed_file: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_count: default_top_count(),
            recent_count: default_recent_count(),
            date_format: default_date_format(),
            unknown_title: default_unknown_title(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.store.backend {
            StoreBackend::Rest => {
                let url = self.store.url.trim();
                if url.is_empty() {
                    return Err(anyhow::anyhow!(
                        "store.url is required for the rest backend"
                    ));
                }
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(anyhow::anyhow!(
                        "store.url must start with http:// or https://, got: {}",
                        url
                    ));
                }
            }
            StoreBackend::Memory => {
                if let Some(seed) = &self.store.seed_file {
                    if !seed.exists() {
                        return Err(anyhow::anyhow!(
                            "store.seed_file does not exist: {}",
                            seed.display()
                        ));
                    }
                }
            }
        }

        if self.store.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("store.timeout_seconds must be greater than zero"));
        }

        if self.enrichment.concurrency == 0 {
            return Err(anyhow::anyhow!("enrichment.concurrency must be at least 1"));
        }

        if self.dashboard.top_count == 0 || self.dashboard.recent_count == 0 {
            return Err(anyhow::anyhow!(
                "dashboard.top_count and dashboard.recent_count must be at least 1"
            ));
        }

        let bad_format = chrono::format::StrftimeItems::new(&self.dashboard.date_format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if bad_format {
            return Err(anyhow::anyhow!(
                "dashboard.date_format is not a valid strftime pattern: {}",
                self.dashboard.date_format
            ));
        }

        Ok(())
    }
}
