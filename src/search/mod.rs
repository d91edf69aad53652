//! Search criteria for the guidance listing
//!
//! A [`SearchCriteria`] value enumerates every filter the listing accepts and
//! maps each one to its fixed short query key. Building and parsing the query
//! string are inverses of each other.

mod criteria;

pub use criteria::{keys, SearchCriteria, SortOrder};

use thiserror::Error;

/// Errors raised while reading criteria
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("Invalid value '{value}' for query key '{key}'")]
    InvalidValue { key: String, value: String },
}
