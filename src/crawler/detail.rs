//! Detail-page crawling: chapter discovery and per-chapter extraction

use crate::crawler::fetcher::{FetchError, Fetcher, Page};
use crate::extract::Parsers;
use crate::records::{Chapter, ChapterContents, GuidanceRecord, ListingEntry};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Crawls one guidance document's chapters
#[derive(Debug)]
pub struct DetailCrawler {
    fetcher: Arc<Fetcher>,
    parsers: Arc<Parsers>,
    chapter_attempts: u32,
    chapter_backoff: Duration,
}

impl DetailCrawler {
    pub fn new(
        fetcher: Arc<Fetcher>,
        parsers: Arc<Parsers>,
        chapter_attempts: u32,
        chapter_backoff: Duration,
    ) -> Self {
        Self {
            fetcher,
            parsers,
            chapter_attempts: chapter_attempts.max(1),
            chapter_backoff,
        }
    }

    /// Turns a listing entry into a record, crawling its detail page
    ///
    /// Never fails: an unreachable detail page yields `contents = None`.
    pub async fn crawl(&self, entry: ListingEntry) -> GuidanceRecord {
        let contents = match self.extract_contents(&entry.url).await {
            Ok(contents) => {
                tracing::info!(
                    "Extracted {} chapter(s) from {}",
                    contents.len(),
                    entry.url
                );
                Some(contents)
            }
            Err(e) => {
                tracing::error!("Failed to crawl detail page {}: {}", entry.url, e);
                None
            }
        };

        GuidanceRecord::new(entry, contents)
    }

    /// Extracts the chapter texts of a detail page
    ///
    /// # Arguments
    ///
    /// * `entry_url` - Absolute URL of the detail page
    ///
    /// # Returns
    ///
    /// * `Ok(ChapterContents)` - Chapters with content, in discovery order.
    ///   Empty when the page has no chapter navigation.
    /// * `Err(CrawlError)` - The detail page itself could not be fetched
    pub async fn extract_contents(&self, entry_url: &str) -> Result<ChapterContents, CrawlError> {
        let url = Url::parse(entry_url)?;
        let page = self.fetcher.fetch(&url).await?;

        let chapters = self.parsers.navigation.discover_html(&page.body, &page.url);
        if chapters.is_empty() {
            tracing::warn!("No chapter navigation found on {}", url);
        }

        let mut contents = ChapterContents::new();
        for chapter in chapters {
            match self.chapter_text(&chapter).await {
                Ok(Some(text)) => contents.insert(chapter.title, text),
                Ok(None) => tracing::warn!(
                    "No content found for chapter '{}' at {}",
                    chapter.title,
                    chapter.url
                ),
                Err(e) => tracing::error!("Skipping chapter '{}': {}", chapter.title, e),
            }
        }

        Ok(contents)
    }

    /// Fetches one chapter and runs the extraction cascade over it
    async fn chapter_text(&self, chapter: &Chapter) -> Result<Option<String>, FetchError> {
        let page = self.fetch_chapter(&chapter.url).await?;

        Ok(self
            .parsers
            .content
            .extract_html(&page.body)
            .map(|(strategy, text)| {
                tracing::debug!("Chapter '{}' extracted via {:?}", chapter.title, strategy);
                text
            }))
    }

    /// Fetches a chapter page with a fixed backoff between attempts
    ///
    /// Only transient failures (timeouts, network errors, 429 and 5xx) are
    /// retried.
    async fn fetch_chapter(&self, url: &Url) -> Result<Page, FetchError> {
        let mut attempt = 1;

        loop {
            match self.fetcher.fetch_once(url).await {
                Ok(page) => {
                    self.fetcher.rate_limiter().pause().await;
                    return Ok(page);
                }
                Err(mut error) => {
                    error.attempts = attempt;
                    if attempt >= self.chapter_attempts || !error.kind.is_transient() {
                        return Err(error);
                    }

                    tracing::warn!(
                        "Chapter attempt {}/{} failed for {}: {}; retrying in {}ms",
                        attempt,
                        self.chapter_attempts,
                        url,
                        error.kind,
                        self.chapter_backoff.as_millis()
                    );
                    tokio::time::sleep(self.chapter_backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
