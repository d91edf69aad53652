//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl pipeline together for each criteria set:
//! - Discovering the listing's page count
//! - Fetching and parsing listing pages under their own concurrency bound
//! - Crawling detail pages under a separate bound
//! - Merging the records of every criteria set once at the end

use crate::config::{Config, CrawlerConfig};
use crate::crawler::detail::DetailCrawler;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::scheduler::TaskPool;
use crate::extract::{ListingContext, Parsers};
use crate::records::{merge, GuidanceRecord, ListingEntry, MergedRecord};
use crate::search::SearchCriteria;
use crate::CrawlError;
use std::sync::Arc;
use tracing::Instrument;
use url::Url;

/// Main crawler structure, shared by every criteria set of a run
pub struct Crawler {
    config: CrawlerConfig,
    base_url: Url,
    fetcher: Arc<Fetcher>,
    parsers: Arc<Parsers>,
    detail: Arc<DetailCrawler>,
    list_pool: TaskPool,
    detail_pool: TaskPool,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlError)` - The HTTP client, base URL or selectors were invalid
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let crawler = &config.crawler;
        let client = build_http_client(&config.user_agent, crawler.request_timeout())?;
        let limiter = Arc::new(RateLimiter::from_config(crawler));
        let fetcher = Arc::new(Fetcher::new(client, crawler.max_retries, limiter));
        let parsers = Arc::new(Parsers::new()?);
        let detail = Arc::new(DetailCrawler::new(
            Arc::clone(&fetcher),
            Arc::clone(&parsers),
            crawler.chapter_retries,
            crawler.chapter_backoff(),
        ));

        Ok(Self {
            config: crawler.clone(),
            base_url: Url::parse(&crawler.base_url)?,
            fetcher,
            parsers,
            detail,
            list_pool: TaskPool::new("listing", crawler.max_concurrent_list_pages as usize),
            detail_pool: TaskPool::new("detail", crawler.max_concurrent_detail_pages as usize),
        })
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// The listing URL for a criteria set
    pub fn listing_url(&self, criteria: &SearchCriteria) -> Url {
        criteria.to_url(&self.base_url)
    }

    /// Reads the total page count from the first listing page
    ///
    /// Any failure here is fatal for the criteria set.
    pub async fn discover_total_pages(&self, search_url: &Url) -> Result<u32, CrawlError> {
        let page = self.fetcher.fetch(search_url).await?;
        let total = self
            .parsers
            .pagination
            .total_pages_html(&page.body, search_url.as_str())?;

        tracing::info!("Listing reports {} page(s)", total);
        Ok(total)
    }

    /// Crawls every listing page of a criteria set
    ///
    /// Pages are fetched concurrently and their entries concatenated in page
    /// order. A failed page is logged and contributes nothing.
    pub async fn crawl_listing(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<ListingEntry>, CrawlError> {
        let discovery_url = self.listing_url(&criteria.with_page(None));
        let total = self.discover_total_pages(&discovery_url).await?;

        let pages: Vec<u32> = match criteria.page {
            Some(page) if page <= total => vec![page],
            Some(page) => {
                tracing::warn!("Requested page {} is beyond the last page {}", page, total);
                Vec::new()
            }
            None => (1..=total).collect(),
        };

        let inputs: Vec<(u32, Url)> = pages
            .iter()
            .map(|&page| (page, self.listing_url(&criteria.with_page(Some(page)))))
            .collect();
        let context = Arc::new(ListingContext::from_criteria(criteria));

        let results = self
            .list_pool
            .run(inputs, |(page, url)| {
                let fetcher = Arc::clone(&self.fetcher);
                let parsers = Arc::clone(&self.parsers);
                let context = Arc::clone(&context);
                async move {
                    let fetched = fetcher.fetch(&url).await?;
                    let entries = parsers
                        .listing
                        .parse_html(&fetched.body, &fetched.url, &context);
                    tracing::debug!("Listing page {} yielded {} entries", page, entries.len());

                    if entries.is_empty() {
                        return Err(CrawlError::EmptyResult {
                            url: url.to_string(),
                        });
                    }
                    Ok(entries)
                }
            })
            .await;

        let mut entries = Vec::new();
        for (page, result) in pages.iter().zip(results) {
            match result {
                Ok(page_entries) => entries.extend(page_entries),
                Err(e @ CrawlError::EmptyResult { .. }) => {
                    tracing::warn!("Listing page {}: {}", page, e)
                }
                Err(e) => tracing::error!("Listing page {} failed: {}", page, e),
            }
        }

        tracing::info!(
            "Collected {} entries from {} listing page(s)",
            entries.len(),
            pages.len()
        );
        Ok(entries)
    }

    /// Crawls the detail page of every entry
    ///
    /// Records come back in entry order. With contents disabled every record
    /// carries `contents = None` and nothing is fetched.
    pub async fn crawl_details(&self, entries: Vec<ListingEntry>) -> Vec<GuidanceRecord> {
        if !self.config.fetch_contents {
            return entries
                .into_iter()
                .map(|entry| GuidanceRecord::new(entry, None))
                .collect();
        }

        let results = self
            .detail_pool
            .run(entries.clone(), |entry| {
                let detail = Arc::clone(&self.detail);
                async move { Ok(detail.crawl(entry).await) }
            })
            .await;

        entries
            .into_iter()
            .zip(results)
            .map(|(entry, result)| match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!("Detail crawl for {} did not complete: {}", entry.url, e);
                    GuidanceRecord::new(entry, None)
                }
            })
            .collect()
    }

    /// Crawls one criteria set: listing then details
    ///
    /// Runs inside a span naming the criteria; every spawned task inherits it.
    pub async fn crawl(&self, criteria: &SearchCriteria) -> Result<Vec<GuidanceRecord>, CrawlError> {
        let span = tracing::info_span!("crawl", criteria = %criteria);

        async {
            tracing::info!("Starting crawl at {}", self.listing_url(criteria));
            let entries = self.crawl_listing(criteria).await?;
            let records = self.crawl_details(entries).await;

            let with_contents = records.iter().filter(|r| r.contents.is_some()).count();
            tracing::info!(
                "Crawled {} record(s), {} with contents",
                records.len(),
                with_contents
            );
            Ok(records)
        }
        .instrument(span)
        .await
    }
}

/// Result of a complete run over all criteria sets
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Merged records of every criteria set that completed
    pub records: Vec<MergedRecord>,

    /// Records produced before merging
    pub raw_count: usize,

    /// Criteria sets whose crawl failed fatally
    pub failed: Vec<(SearchCriteria, CrawlError)>,
}

impl CrawlOutcome {
    /// True when at least one criteria set was attempted and none completed
    pub fn all_failed(&self, attempted: usize) -> bool {
        attempted > 0 && self.failed.len() == attempted
    }
}

/// Runs the crawl for every configured criteria set
///
/// Sets run one after another; their records are concatenated in
/// configuration order and merged once.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use guidance_crawler::config::load_config;
/// use guidance_crawler::run_crawl;
/// use std::path::Path;
///
/// let config = load_config(Path::new("crawler.toml"))?;
/// let outcome = run_crawl(&config).await?;
/// println!("{} unique records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome, CrawlError> {
    let crawler = Crawler::new(config)?;
    let mut records = Vec::new();
    let mut failed = Vec::new();

    for criteria in &config.search {
        match crawler.crawl(criteria).await {
            Ok(set_records) => records.extend(set_records),
            Err(e) => {
                tracing::error!("Crawl aborted for [{}]: {}", criteria, e);
                failed.push((criteria.clone(), e));
            }
        }
    }

    let raw_count = records.len();
    let records = merge(records);

    tracing::info!(
        "Run finished: {} unique record(s), {} criteria set(s) failed",
        records.len(),
        failed.len()
    );

    Ok(CrawlOutcome {
        records,
        raw_count,
        failed,
    })
}
