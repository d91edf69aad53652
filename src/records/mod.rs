//! Guidance records and their post-crawl merge
//!
//! Listing rows become [`ListingEntry`] values, detail crawls turn them into
//! [`GuidanceRecord`]s, and [`merge`] collapses duplicates into
//! [`MergedRecord`]s ready for output.

mod merge;
mod types;

pub use merge::merge;
pub use types::{Chapter, ChapterContents, GuidanceRecord, ListingEntry, MergedRecord};
