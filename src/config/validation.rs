use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::search::SearchCriteria;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    for (index, criteria) in config.search.iter().enumerate() {
        validate_search(index, criteria)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use HTTP or HTTPS, got '{}'",
            config.base_url
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "max_retries must be >= 1".to_string(),
        ));
    }

    if config.chapter_retries < 1 {
        return Err(ConfigError::Validation(
            "chapter_retries must be >= 1".to_string(),
        ));
    }

    for (name, value) in [
        ("max_concurrent_list_pages", config.max_concurrent_list_pages),
        ("max_concurrent_detail_pages", config.max_concurrent_detail_pages),
    ] {
        if !(1..=100).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and 100, got {}",
                name, value
            )));
        }
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if matches!(&config.contents_directory, Some(dir) if dir.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "contents_directory cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates one `[[search]]` entry
fn validate_search(index: usize, criteria: &SearchCriteria) -> Result<(), ConfigError> {
    if let (Some(from), Some(to)) = (criteria.from_date, criteria.to_date) {
        if from > to {
            return Err(ConfigError::Validation(format!(
                "search #{}: from-date {} is after to-date {}",
                index + 1,
                from,
                to
            )));
        }
    }

    if criteria.page_size == Some(0) {
        return Err(ConfigError::Validation(format!(
            "search #{}: page-size must be >= 1",
            index + 1
        )));
    }

    if criteria.page == Some(0) {
        return Err(ConfigError::Validation(format!(
            "search #{}: page must be >= 1",
            index + 1
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
