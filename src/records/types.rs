use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::Url;

/// One row of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Absolute, normalized detail-page URL
    pub url: String,

    pub title: String,

    /// Document reference, e.g. "NG28"
    pub reference: String,

    /// Publication date as `YYYY-MM-DD` when machine-readable, else the cell text
    pub published_date: String,

    /// Last update date, same convention as `published_date`
    pub last_updated: String,

    /// Type filter active when the row was listed
    pub document_type: String,

    /// Programme filter active when the row was listed
    pub programme: Option<String>,
}

/// A chapter link found on a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub url: Url,
}

/// Chapter texts of one document, keyed by chapter title in discovery order
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterContents {
    entries: Vec<(String, String)>,
}

impl ChapterContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a chapter's text
    ///
    /// A repeated title replaces the earlier text but keeps its position.
    pub fn insert(&mut self, title: impl Into<String>, text: impl Into<String>) {
        let title = title.into();
        let text = text.into();

        match self.entries.iter_mut().find(|(t, _)| *t == title) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((title, text)),
        }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, text)| text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, text)| (t.as_str(), text.as_str()))
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl Serialize for ChapterContents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, text) in &self.entries {
            map.serialize_entry(title, text)?;
        }
        map.end()
    }
}

/// A listing entry together with the outcome of its detail-page crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidanceRecord {
    #[serde(flatten)]
    pub entry: ListingEntry,

    /// `None` when the detail page could not be crawled
    pub contents: Option<ChapterContents>,
}

impl GuidanceRecord {
    pub fn new(entry: ListingEntry, contents: Option<ChapterContents>) -> Self {
        Self { entry, contents }
    }

    pub fn url(&self) -> &str {
        &self.entry.url
    }
}

/// One record per unique URL, with multi-valued fields widened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub url: String,
    pub title: String,
    pub reference: String,
    pub published_date: String,
    pub last_updated: String,

    /// Distinct document types observed across duplicates, first-seen order
    #[serde(rename = "document_type")]
    pub document_types: Option<Vec<String>>,

    /// Distinct programmes observed across duplicates, first-seen order
    #[serde(rename = "programme")]
    pub programmes: Option<Vec<String>>,

    pub contents: Option<ChapterContents>,
}
