//! Listing-page row parsing
//!
//! Each `table tbody tr` row of a listing page describes one guidance
//! document. Columns are: title link, reference, published date, last
//! updated. Rows that don't fit the shape are logged and dropped.

use crate::extract::compile;
use crate::extract::text::{element_text, normalize_whitespace};
use crate::records::ListingEntry;
use crate::search::SearchCriteria;
use crate::url::resolve_link;
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Minimum number of cells a listing row must have
pub const MIN_COLUMNS: usize = 4;

/// Why a row was dropped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("Row has insufficient columns (expected 4, got {0})")]
    TooFewColumns(usize),

    #[error("Title link not found")]
    MissingTitleLink,

    #[error("Title link '{0}' does not resolve to a document URL")]
    UnresolvableLink(String),
}

/// Type and programme stamped onto every row of one listing crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingContext {
    pub document_type: String,
    pub programme: Option<String>,
}

impl ListingContext {
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        Self {
            document_type: criteria.document_type().unwrap_or_default().to_string(),
            programme: criteria.programme().map(str::to_string),
        }
    }
}

/// Parser for listing pages, holding its compiled selectors
#[derive(Debug)]
pub struct ListingParser {
    row: Selector,
    cell: Selector,
    link: Selector,
    time: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            row: compile("table tbody tr")?,
            cell: compile("td")?,
            link: compile("a[href]")?,
            time: compile("time")?,
        })
    }

    /// Lazily yields the entries of one listing page
    ///
    /// Malformed rows are logged at warning level and skipped; they never
    /// affect sibling rows.
    pub fn parse<'a>(
        &'a self,
        document: &'a Html,
        base_url: &'a Url,
        context: &'a ListingContext,
    ) -> impl Iterator<Item = ListingEntry> + 'a {
        document
            .select(&self.row)
            .enumerate()
            .filter_map(move |(index, row)| match self.parse_row(row, base_url, context) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping listing row {}: {}", index + 1, e);
                    None
                }
            })
    }

    /// Parses a listing page from raw HTML into owned entries
    pub fn parse_html(&self, html: &str, base_url: &Url, context: &ListingContext) -> Vec<ListingEntry> {
        let document = Html::parse_document(html);
        self.parse(&document, base_url, context).collect()
    }

    fn parse_row(
        &self,
        row: ElementRef<'_>,
        base_url: &Url,
        context: &ListingContext,
    ) -> Result<ListingEntry, RowError> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.cell).collect();
        if cells.len() < MIN_COLUMNS {
            return Err(RowError::TooFewColumns(cells.len()));
        }

        let link = cells[0]
            .select(&self.link)
            .next()
            .ok_or(RowError::MissingTitleLink)?;
        let href = link.value().attr("href").unwrap_or_default();
        let url = resolve_link(href, base_url)
            .ok_or_else(|| RowError::UnresolvableLink(href.to_string()))?;

        Ok(ListingEntry {
            url: url.to_string(),
            title: element_text(link),
            reference: element_text(cells[1]),
            published_date: self.date_cell(cells[2]),
            last_updated: self.date_cell(cells[3]),
            document_type: context.document_type.clone(),
            programme: context.programme.clone(),
        })
    }

    /// Reads a date cell: the `<time datetime>` prefix if present, else the text
    fn date_cell(&self, cell: ElementRef<'_>) -> String {
        cell.select(&self.time)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .map(|datetime| datetime.trim().chars().take(10).collect::<String>())
            .unwrap_or_else(|| normalize_whitespace(&cell.text().collect::<Vec<_>>().join(" ")))
    }
}
