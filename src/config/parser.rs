use crate::config::types::Config;
use crate::config::validation::validate;
use crate::search::SearchCriteria;
use crate::ConfigError;
use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Page size used by the default search
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Loads and parses a configuration file from the given path
///
/// When the file declares no `[[search]]` table, a single default search
/// covering everything published since 2000-01-01 is added.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use guidance_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Max retries: {}", config.crawler.max_retries);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    if config.search.is_empty() {
        config.search.push(default_search(Local::now().date_naive()));
    }

    validate(&config)?;

    Ok(config)
}

/// The search used when none is configured: everything from 2000-01-01 to `today`
pub fn default_search(today: NaiveDate) -> SearchCriteria {
    SearchCriteria {
        from_date: NaiveDate::from_ymd_opt(2000, 1, 1),
        to_date: Some(today),
        page_size: Some(DEFAULT_PAGE_SIZE),
        ..Default::default()
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is logged at startup so runs can be matched to the exact configuration.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
