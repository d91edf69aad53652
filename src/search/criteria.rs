use crate::search::CriteriaError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Query keys understood by the guidance listing
pub mod keys {
    pub const QUERY: &str = "q";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const DOCUMENT_TYPE: &str = "ndt";
    pub const GUIDANCE_PROGRAMME: &str = "ngt";
    pub const ADVICE_PROGRAMME: &str = "nat";
    pub const SORT: &str = "s";
    pub const PAGE_SIZE: &str = "ps";
    pub const PAGE: &str = "pa";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sort order offered by the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Title,
    Date,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Date => "Date",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Title" => Ok(Self::Title),
            "Date" => Ok(Self::Date),
            other => Err(CriteriaError::InvalidValue {
                key: keys::SORT.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Filters for one listing crawl
///
/// Every field is optional. Unset fields (and text fields holding only
/// whitespace) are left out of the outbound query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchCriteria {
    /// Free-text search
    pub query: Option<String>,

    /// Earliest publication date
    pub from_date: Option<NaiveDate>,

    /// Latest publication date
    pub to_date: Option<NaiveDate>,

    /// Document type, e.g. "Guidance" or "NICE advice"
    #[serde(rename = "type")]
    pub document_type: Option<String>,

    /// Programme filter used with the "Guidance" type
    pub guidance_programme: Option<String>,

    /// Programme filter used with the "NICE advice" type
    pub advice_programme: Option<String>,

    pub sort: Option<SortOrder>,

    /// Results per listing page
    pub page_size: Option<u32>,

    /// One-based listing page number
    pub page: Option<u32>,
}

/// Returns the trimmed value if it carries any text
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl SearchCriteria {
    /// Returns the criteria with the page number replaced
    pub fn with_page(&self, page: Option<u32>) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// The document type, if set
    pub fn document_type(&self) -> Option<&str> {
        non_empty(&self.document_type)
    }

    /// The active programme: the guidance programme, else the advice programme
    pub fn programme(&self) -> Option<&str> {
        non_empty(&self.guidance_programme).or_else(|| non_empty(&self.advice_programme))
    }

    /// Returns true when no filter at all is set
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Builds the query parameters in their fixed order, omitting unset fields
    ///
    /// # Examples
    ///
    /// ```
    /// use guidance_crawler::SearchCriteria;
    ///
    /// let criteria = SearchCriteria {
    ///     document_type: Some("Guidance".to_string()),
    ///     page_size: Some(15),
    ///     ..Default::default()
    /// };
    /// let pairs = criteria.query_pairs();
    /// assert_eq!(pairs, vec![("ndt", "Guidance".to_string()), ("ps", "15".to_string())]);
    /// ```
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(query) = non_empty(&self.query) {
            pairs.push((keys::QUERY, query.to_string()));
        }
        if let Some(date) = self.from_date {
            pairs.push((keys::FROM, date.format(DATE_FORMAT).to_string()));
        }
        if let Some(date) = self.to_date {
            pairs.push((keys::TO, date.format(DATE_FORMAT).to_string()));
        }
        if let Some(value) = non_empty(&self.document_type) {
            pairs.push((keys::DOCUMENT_TYPE, value.to_string()));
        }
        if let Some(value) = non_empty(&self.guidance_programme) {
            pairs.push((keys::GUIDANCE_PROGRAMME, value.to_string()));
        }
        if let Some(value) = non_empty(&self.advice_programme) {
            pairs.push((keys::ADVICE_PROGRAMME, value.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push((keys::SORT, sort.as_str().to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push((keys::PAGE_SIZE, size.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push((keys::PAGE, page.to_string()));
        }

        pairs
    }

    /// Encodes the criteria as a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Builds the listing URL for these criteria on top of `base`
    ///
    /// Any query already present on `base` is replaced.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let pairs = self.query_pairs();

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        url
    }

    /// Parses criteria back out of a listing query string
    ///
    /// Unknown keys are ignored. Empty values are treated as unset.
    pub fn from_query(query: &str) -> Result<Self, CriteriaError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut criteria = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.trim().is_empty() {
                continue;
            }
            let value = value.into_owned();

            match key.as_ref() {
                keys::QUERY => criteria.query = Some(value),
                keys::FROM => criteria.from_date = Some(parse_date(keys::FROM, &value)?),
                keys::TO => criteria.to_date = Some(parse_date(keys::TO, &value)?),
                keys::DOCUMENT_TYPE => criteria.document_type = Some(value),
                keys::GUIDANCE_PROGRAMME => criteria.guidance_programme = Some(value),
                keys::ADVICE_PROGRAMME => criteria.advice_programme = Some(value),
                keys::SORT => criteria.sort = Some(value.parse()?),
                keys::PAGE_SIZE => criteria.page_size = Some(parse_number(keys::PAGE_SIZE, &value)?),
                keys::PAGE => criteria.page = Some(parse_number(keys::PAGE, &value)?),
                other => tracing::debug!("Ignoring unknown query key '{}'", other),
            }
        }

        Ok(criteria)
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| CriteriaError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_number(key: &str, value: &str) -> Result<u32, CriteriaError> {
    value.parse().map_err(|_| CriteriaError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return write!(f, "all");
        }

        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", rendered.join(", "))
    }
}
