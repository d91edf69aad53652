//! Crawler module for listing and detail page retrieval
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Randomized request pacing
//! - Bounded task scheduling per concurrency domain
//! - Detail-page chapter crawling
//! - Overall crawl coordination

mod coordinator;
mod detail;
mod fetcher;
mod rate_limit;
mod scheduler;

pub use coordinator::{run_crawl, CrawlOutcome, Crawler};
pub use detail::DetailCrawler;
pub use fetcher::{build_http_client, FetchError, FetchErrorKind, Fetcher, Page};
pub use rate_limit::RateLimiter;
pub use scheduler::TaskPool;
