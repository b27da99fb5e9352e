use super::prompts;
use crate::output::{new_table, Output};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use marquee_config::{Config, CredentialStore, PathManager, StoreBackend, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Store {
            backend,
            url,
            seed_file,
        } => configure_store(backend, url, seed_file, output),
        ConfigCommands::ApiKey { key } => configure_api_key(key, output),
    }
}

fn load_config(path_manager: &PathManager) -> Result<(PathBuf, Config)> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    Ok((config_file, config))
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store.load().map_err(|e| {
        color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e)
    })?;
    Ok(cred_store)
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let (config_file, config) = load_config(&path_manager)?;
    let cred_store = load_credentials(&path_manager)?;

    let api_key = cred_store.resolve_store_api_key().unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };
    let api_key_source = if std::env::var(API_KEY_ENV).map_or(false, |v| !v.trim().is_empty()) {
        API_KEY_ENV.to_string()
    } else {
        path_manager.credentials_file().display().to_string()
    };

    if !output.is_human() {
        output.data(&json!({
            "config_file": config_file.display().to_string(),
            "exists": config_file.exists(),
            "store": {
                "backend": config.store.backend,
                "url": config.store.url,
                "seed_file": config.store.seed_file,
                "timeout_seconds": config.store.timeout_seconds,
                "api_key": api_key_display,
                "api_key_source": api_key_source,
            },
            "browse": config.browse,
            "enrichment": config.enrichment,
            "dashboard": config.dashboard,
        }))?;
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.println("Showing defaults. Run 'marquee config store' to create it.");
    }

    let mut info_table = new_table();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);
    output.table(&info_table);

    let mut store_table = section("Data Store");
    store_table.add_row(vec![Cell::new("Backend"), Cell::new(backend_name(config.store.backend))]);
    match config.store.backend {
        StoreBackend::Rest => {
            let url = if config.store.url.is_empty() {
                "<not set>".bright_black().to_string()
            } else {
                config.store.url.clone()
            };
            store_table.add_row(vec![Cell::new("URL"), Cell::new(url)]);
            store_table.add_row(vec![Cell::new("API Key"), Cell::new(api_key_display)]);
            store_table.add_row(vec![Cell::new("API Key Source"), Cell::new(api_key_source)]);
            store_table.add_row(vec![
                Cell::new("Timeout"),
                Cell::new(format!("{}s", config.store.timeout_seconds)),
            ]);
        }
        StoreBackend::Memory => {
            let seed = config
                .store
                .seed_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<empty catalog>".to_string());
            store_table.add_row(vec![Cell::new("Seed File"), Cell::new(seed)]);
        }
    }
    output.table(&store_table);

    let mut browse_table = section("Browsing");
    browse_table.add_row(vec![Cell::new("Default Sort"), Cell::new(config.browse.sort)]);
    browse_table.add_row(vec![Cell::new("Default Filter"), Cell::new(config.browse.filter)]);
    browse_table.add_row(vec![
        Cell::new("Review Query Concurrency"),
        Cell::new(config.enrichment.concurrency),
    ]);
    output.table(&browse_table);

    let mut dashboard_table = section("Dashboard");
    dashboard_table.add_row(vec![Cell::new("Most Reviewed Shown"), Cell::new(config.dashboard.top_count)]);
    dashboard_table.add_row(vec![Cell::new("Recent Reviews Shown"), Cell::new(config.dashboard.recent_count)]);
    dashboard_table.add_row(vec![Cell::new("Date Format"), Cell::new(&config.dashboard.date_format)]);
    output.table(&dashboard_table);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
    }
    Ok(())
}

fn section(title: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new(title)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)]);
    table
}

fn backend_name(backend: StoreBackend) -> &'static str {
    match backend {
        StoreBackend::Rest => "rest (PostgREST)",
        StoreBackend::Memory => "memory",
    }
}

fn configure_store(
    backend: Option<StoreBackend>,
    url: Option<String>,
    seed_file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;
    let (config_file, mut config) = load_config(&path_manager)?;

    if let Some(backend) = backend {
        config.store.backend = backend;
    }
    if let Some(seed_file) = seed_file {
        config.store.seed_file = Some(seed_file);
    }

    match url {
        Some(url) => config.store.url = url.trim().trim_end_matches('/').to_string(),
        None if backend.is_none() && config.store.backend == StoreBackend::Rest => {
            let current = (!config.store.url.is_empty()).then_some(config.store.url.as_str());
            let entered = prompts::prompt_string("PostgREST URL (e.g. https://xyz.supabase.co)", current)?;
            config.store.url = entered.trim().trim_end_matches('/').to_string();
        }
        None => {}
    }

    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration not saved: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!(
        "Data store set to {} ({})",
        backend_name(config.store.backend),
        config_file.display()
    ));
    Ok(())
}

fn configure_api_key(key: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;
    let mut cred_store = load_credentials(&path_manager)?;

    let key = match key {
        Some(k) => k,
        None => prompts::prompt_password("Data store API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }

    cred_store.set_store_api_key(key.clone());
    cred_store.save().map_err(|e| {
        color_eyre::eyre::eyre!(
            "Failed to save credentials to {}: {}",
            path_manager.credentials_file().display(),
            e
        )
    })?;

    output.success(format!("API key saved ({})", mask_string(&key)));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
