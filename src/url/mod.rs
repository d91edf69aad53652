//! URL handling module
//!
//! This module provides link resolution against a page's base URL and the
//! normalization used to decide when two listing rows are the same document.

mod normalize;

pub use normalize::normalize_url;

use url::Url;

/// Resolves a link href to an absolute, normalized URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that fail to resolve or normalize
///
/// # Examples
///
/// ```
/// use guidance_crawler::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/guidance/published?ps=15").unwrap();
/// let url = resolve_link("/guidance/ng28", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/guidance/ng28");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match normalize_url(absolute.as_str()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Dropping link {}: {}", href, e);
            None
        }
    }
}
