use crate::search::SearchCriteria;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Listing crawled when no `base-url` is configured
pub const DEFAULT_BASE_URL: &str = "https://www.nice.org.uk/guidance/published";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: Vec<SearchCriteria>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Listing page the search criteria are applied to
    pub base_url: String,

    /// Attempts per request before giving up
    pub max_retries: u32,

    /// Listing pages fetched at once
    pub max_concurrent_list_pages: u32,

    /// Detail pages (with their chapters) crawled at once
    pub max_concurrent_detail_pages: u32,

    /// Total timeout per request (seconds)
    pub request_timeout_secs: u64,

    /// Lower bound of the randomized delay around requests (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the randomized delay around requests (milliseconds)
    pub max_delay_ms: u64,

    /// Attempts per chapter page
    pub chapter_retries: u32,

    /// Fixed wait between chapter attempts (milliseconds)
    pub chapter_backoff_ms: u64,

    /// Whether to crawl detail pages at all
    pub fetch_contents: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            max_concurrent_list_pages: 5,
            max_concurrent_detail_pages: 5,
            request_timeout_secs: 30,
            min_delay_ms: 700,
            max_delay_ms: 1200,
            chapter_retries: 3,
            chapter_backoff_ms: 1000,
            fetch_contents: true,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn chapter_backoff(&self) -> Duration {
        Duration::from_millis(self.chapter_backoff_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Which files the output step writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    Both,
}

impl OutputFormat {
    pub fn writes_csv(&self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown output format '{}' (expected csv, json or both)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Directory receiving the catalogue files
    pub directory: String,

    pub format: OutputFormat,

    /// Directory receiving one contents file per record, if set
    pub contents_directory: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            format: OutputFormat::Csv,
            contents_directory: None,
        }
    }
}
