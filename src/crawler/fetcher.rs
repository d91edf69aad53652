//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests returning the page body
//! - Retry logic with randomized pacing between attempts
//! - Error classification

use crate::config::UserAgentConfig;
use crate::crawler::rate_limit::RateLimiter;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single request attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the timeout
    Timeout,

    /// Connection, TLS, or body transfer failure
    Network,

    /// The server answered with a non-success status
    HttpStatus(u16),
}

impl FetchErrorKind {
    /// Whether a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Network => true,
            Self::HttpStatus(code) => *code == 429 || (500..=599).contains(code),
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Network => f.write_str("network error"),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
        }
    }
}

/// A request that failed on its last permitted attempt
#[derive(Debug, Error)]
#[error("fetching {url} failed after {attempts} attempt(s): {kind} ({detail})")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
    pub attempts: u32,
    pub detail: String,
}

impl FetchError {
    fn new(url: &Url, kind: FetchErrorKind, detail: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            kind,
            attempts: 1,
            detail: detail.into(),
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::Network
        };
        Self::new(url, kind, error.to_string())
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects
    pub url: Url,
    pub status: u16,
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout applied to each request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use guidance_crawler::config::UserAgentConfig;
/// use guidance_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "GuidanceCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared fetcher: one client, one attempt budget, one rate limiter
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    limiter: Arc<RateLimiter>,
}

impl Fetcher {
    pub fn new(client: Client, max_attempts: u32, limiter: Arc<RateLimiter>) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            limiter,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches a URL, retrying any failure up to the attempt budget
    ///
    /// # Retry Logic
    ///
    /// | Event | Action |
    /// |-------|--------|
    /// | Success | Pause, return the page |
    /// | Failure, attempts left | Warn, pause, try again |
    /// | Failure, budget spent | Log error, return `FetchError` |
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The body of the first successful attempt
    /// * `Err(FetchError)` - The last attempt's failure
    pub async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let mut attempt = 1;

        loop {
            match self.fetch_once(url).await {
                Ok(page) => {
                    tracing::debug!("Fetched {} ({}, attempt {})", url, page.status, attempt);
                    self.limiter.pause().await;
                    return Ok(page);
                }
                Err(mut error) => {
                    error.attempts = attempt;
                    tracing::warn!(
                        "Attempt {}/{} failed for {}: {} ({})",
                        attempt,
                        self.max_attempts,
                        url,
                        error.kind,
                        error.detail
                    );

                    if attempt >= self.max_attempts {
                        tracing::error!(
                            "Giving up on {} after {} attempt(s)",
                            url,
                            self.max_attempts
                        );
                        return Err(error);
                    }

                    self.limiter.pause().await;
                    attempt += 1;
                }
            }
        }
    }

    /// Performs a single GET without pacing or retries
    pub async fn fetch_once(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                url,
                FetchErrorKind::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}
