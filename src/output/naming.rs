use crate::search::SearchCriteria;

const PREFIX: &str = "guidance";

/// Derives the output file stem from the crawled criteria sets
///
/// The stem is `guidance` followed by the distinct types, programmes, from
/// dates and to dates across all sets, joined with `_`. Spaces (and path
/// separators) become `-`. With no such filter set the stem is
/// `guidance_all`.
///
/// # Examples
///
/// ```
/// use guidance_crawler::output::output_stem;
/// use guidance_crawler::SearchCriteria;
///
/// let criteria = SearchCriteria {
///     document_type: Some("Guidance".to_string()),
///     guidance_programme: Some("NICE guidelines".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(output_stem(&[criteria]), "guidance_Guidance_NICE-guidelines");
/// assert_eq!(output_stem(&[]), "guidance_all");
/// ```
pub fn output_stem(criteria: &[SearchCriteria]) -> String {
    let mut parts = vec![PREFIX.to_string()];

    let fields: [fn(&SearchCriteria) -> Option<String>; 4] = [
        |c| c.document_type().map(str::to_string),
        |c| c.programme().map(str::to_string),
        |c| c.from_date.map(|d| d.to_string()),
        |c| c.to_date.map(|d| d.to_string()),
    ];

    for field in fields {
        let mut seen: Vec<String> = Vec::new();
        for value in criteria.iter().filter_map(field) {
            let part = sanitize(&value);
            if !part.is_empty() && !seen.contains(&part) {
                seen.push(part);
            }
        }
        parts.extend(seen);
    }

    if parts.len() == 1 {
        parts.push("all".to_string());
    }

    parts.join("_")
}

/// Output file name for the criteria sets with the given extension
pub fn output_filename(criteria: &[SearchCriteria], extension: &str) -> String {
    format!("{}.{}", output_stem(criteria), extension)
}

/// Makes a value safe to embed in a file name
pub(crate) fn sanitize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '-'
            } else {
                c
            }
        })
        .collect()
}
