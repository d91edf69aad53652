//! HTML extraction for listing, detail and chapter pages
//!
//! Everything here is synchronous and works on parsed documents:
//! - Listing rows into [`ListingEntry`](crate::records::ListingEntry) values
//! - The listing's total page count
//! - Chapter navigation on detail pages
//! - Chapter text through an ordered cascade of layout strategies
//!
//! Parsers compile their selectors once and are shared across tasks.

mod content;
mod listing;
mod navigation;
mod pagination;
mod text;

pub use content::{ContentExtractor, ExtractionStrategy};
pub use listing::{ListingContext, ListingParser, RowError, MIN_COLUMNS};
pub use navigation::{NavigationParser, NavigationStrategy};
pub use pagination::{PaginationParser, TOTAL_PAGES_SELECTOR};
pub use text::normalize_whitespace;

use crate::CrawlError;
use scraper::Selector;

/// Compiles a CSS selector, mapping failures into [`CrawlError::Selector`]
pub(crate) fn compile(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|e| CrawlError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// All page parsers used by one crawl
#[derive(Debug)]
pub struct Parsers {
    pub listing: ListingParser,
    pub pagination: PaginationParser,
    pub navigation: NavigationParser,
    pub content: ContentExtractor,
}

impl Parsers {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            listing: ListingParser::new()?,
            pagination: PaginationParser::new()?,
            navigation: NavigationParser::new()?,
            content: ContentExtractor::new()?,
        })
    }
}
