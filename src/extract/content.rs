//! Chapter text extraction
//!
//! Chapter pages come in several layouts. Each [`ExtractionStrategy`] knows
//! one layout; the cascade tries them in priority order and keeps the first
//! non-empty text. All returned text is single-line: whitespace is collapsed
//! and headings are wrapped as `### heading ###` so sections can be split
//! again downstream.

use crate::extract::compile;
use crate::extract::text::{element_text, heading_marker, is_heading, normalize_whitespace};
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Headings and paragraphs inside `<article>`
    Article,
    /// Headings, paragraphs and list items inside the in-page chapter div
    ChapterDiv,
    /// Raw text of the section summary container
    SectionSummary,
}

impl ExtractionStrategy {
    pub const ORDER: [ExtractionStrategy; 3] =
        [Self::Article, Self::ChapterDiv, Self::SectionSummary];
}

#[derive(Debug)]
pub struct ContentExtractor {
    article: Selector,
    article_blocks: Selector,
    chapter_div: Selector,
    chapter_blocks: Selector,
    section_summary: Selector,
}

impl ContentExtractor {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            article: compile("article")?,
            article_blocks: compile("h2, h3, h4, p")?,
            chapter_div: compile("div.js-in-page-nav-target div.chapter")?,
            chapter_blocks: compile("h1, h2, h3, h4, h5, p, li")?,
            section_summary: compile("div.section-summary.web-viewer-content")?,
        })
    }

    /// Runs the cascade and returns the first non-empty text with the
    /// strategy that produced it
    pub fn extract(&self, document: &Html) -> Option<(ExtractionStrategy, String)> {
        ExtractionStrategy::ORDER
            .into_iter()
            .find_map(|strategy| self.try_strategy(strategy, document).map(|text| (strategy, text)))
    }

    /// Runs the cascade over raw HTML
    pub fn extract_html(&self, html: &str) -> Option<(ExtractionStrategy, String)> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }

    /// Applies one strategy; `None` when its container is missing or empty
    pub fn try_strategy(&self, strategy: ExtractionStrategy, document: &Html) -> Option<String> {
        let text = match strategy {
            ExtractionStrategy::Article => {
                let article = document.select(&self.article).next()?;
                blocks_text(article, &self.article_blocks)
            }
            ExtractionStrategy::ChapterDiv => {
                let chapter = document.select(&self.chapter_div).next()?;
                blocks_text(chapter, &self.chapter_blocks)
            }
            ExtractionStrategy::SectionSummary => {
                let section = document.select(&self.section_summary).next()?;
                element_text(section)
            }
        };

        (!text.is_empty()).then_some(text)
    }
}

/// Joins the text of every matching block under `container`, marking headings
fn blocks_text(container: ElementRef<'_>, blocks: &Selector) -> String {
    let parts: Vec<String> = container
        .select(blocks)
        .filter_map(|block| {
            let text = element_text(block);
            if text.is_empty() {
                None
            } else if is_heading(block) {
                Some(heading_marker(&text))
            } else {
                Some(text)
            }
        })
        .collect();

    normalize_whitespace(&parts.join(" "))
}
