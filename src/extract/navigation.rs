//! Chapter navigation discovery on detail pages
//!
//! Guidance documents list their chapters in one of two navigation shapes.
//! The shapes are tried in priority order and the first one that yields at
//! least one chapter wins. A page matching neither has no chapters.

use crate::extract::compile;
use crate::extract::text::element_text;
use crate::records::Chapter;
use crate::url::resolve_link;
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// The navigation shapes, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStrategy {
    /// `nav.stacked-nav[aria-label="Chapters"]` list
    StackedNav,
    /// `#overview-menu` link followed by the `#Guidance-Menu` list
    GuidanceMenu,
}

impl NavigationStrategy {
    pub const ORDER: [NavigationStrategy; 2] = [Self::StackedNav, Self::GuidanceMenu];
}

#[derive(Debug)]
pub struct NavigationParser {
    stacked_item: Selector,
    stacked_title: Selector,
    overview_link: Selector,
    guidance_item: Selector,
    link: Selector,
}

impl NavigationParser {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            stacked_item: compile(
                r#"nav.stacked-nav[aria-label="Chapters"] ul.stacked-nav__list li.stacked-nav__list-item"#,
            )?,
            stacked_title: compile("span.stacked-nav__content-wrapper")?,
            overview_link: compile("div#overview-menu a[href]")?,
            guidance_item: compile("div#guidance-menu ul.nav.nav-list#Guidance-Menu li")?,
            link: compile("a[href]")?,
        })
    }

    /// Discovers the chapters of a detail page
    ///
    /// Returns the strategy that matched together with its chapters, or
    /// `None` when no navigation shape yields anything.
    pub fn discover(
        &self,
        document: &Html,
        page_url: &Url,
    ) -> Option<(NavigationStrategy, Vec<Chapter>)> {
        NavigationStrategy::ORDER.into_iter().find_map(|strategy| {
            let chapters = self.try_strategy(strategy, document, page_url);
            (!chapters.is_empty()).then_some((strategy, chapters))
        })
    }

    /// Discovers chapters from raw HTML; empty when nothing matched
    pub fn discover_html(&self, html: &str, page_url: &Url) -> Vec<Chapter> {
        let document = Html::parse_document(html);
        match self.discover(&document, page_url) {
            Some((strategy, chapters)) => {
                tracing::debug!(
                    "Found {} chapters via {:?} on {}",
                    chapters.len(),
                    strategy,
                    page_url
                );
                chapters
            }
            None => Vec::new(),
        }
    }

    fn try_strategy(
        &self,
        strategy: NavigationStrategy,
        document: &Html,
        page_url: &Url,
    ) -> Vec<Chapter> {
        match strategy {
            NavigationStrategy::StackedNav => self.stacked_nav(document, page_url),
            NavigationStrategy::GuidanceMenu => self.guidance_menu(document, page_url),
        }
    }

    fn stacked_nav(&self, document: &Html, page_url: &Url) -> Vec<Chapter> {
        document
            .select(&self.stacked_item)
            .filter_map(|item| {
                let link = item.select(&self.link).next()?;
                let title = item.select(&self.stacked_title).next()?;
                chapter(element_text(title), link, page_url)
            })
            .collect()
    }

    fn guidance_menu(&self, document: &Html, page_url: &Url) -> Vec<Chapter> {
        let overview = document
            .select(&self.overview_link)
            .next()
            .and_then(|link| chapter(element_text(link), link, page_url));

        let menu = document.select(&self.guidance_item).filter_map(|item| {
            let link = item.select(&self.link).next()?;
            chapter(element_text(link), link, page_url)
        });

        overview.into_iter().chain(menu).collect()
    }
}

fn chapter(title: String, link: ElementRef<'_>, page_url: &Url) -> Option<Chapter> {
    let href = link.value().attr("href")?;
    let url = resolve_link(href, page_url)?;
    Some(Chapter { title, url })
}
