use crate::extract::compile;
use crate::extract::text::element_text;
use crate::CrawlError;
use scraper::{Html, Selector};

/// Element carrying the listing's total page count
pub const TOTAL_PAGES_SELECTOR: &str = ".pagination__total-pages";

/// Reads the total page count from a listing page
#[derive(Debug)]
pub struct PaginationParser {
    total_pages: Selector,
}

impl PaginationParser {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            total_pages: compile(TOTAL_PAGES_SELECTOR)?,
        })
    }

    /// Parses the total page count
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The page count reported by the listing
    /// * `Err(CrawlError::Parse)` - The element is missing or not an integer
    pub fn total_pages(&self, document: &Html, url: &str) -> Result<u32, CrawlError> {
        let element = document
            .select(&self.total_pages)
            .next()
            .ok_or_else(|| CrawlError::Parse {
                url: url.to_string(),
                message: format!("pagination count element '{}' not found", TOTAL_PAGES_SELECTOR),
            })?;

        let text = element_text(element);
        text.parse::<u32>().map_err(|_| CrawlError::Parse {
            url: url.to_string(),
            message: format!("pagination count '{}' is not an integer", text),
        })
    }

    /// Parses the total page count from raw HTML
    pub fn total_pages_html(&self, html: &str, url: &str) -> Result<u32, CrawlError> {
        let document = Html::parse_document(html);
        self.total_pages(&document, url)
    }
}
