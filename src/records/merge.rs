use crate::records::{GuidanceRecord, MergedRecord};
use std::collections::HashMap;

/// Merges records that share a URL
///
/// Records are grouped by exact URL string. Within a group, document types
/// and programmes are widened to the distinct non-empty values in first-seen
/// order (absent when none were seen); every other field comes from the
/// first record of the group. Output order follows each URL's first
/// appearance in the input.
///
/// # Examples
///
/// ```
/// use guidance_crawler::records::{merge, GuidanceRecord, ListingEntry};
///
/// let entry = |doc_type: &str| ListingEntry {
///     url: "https://example.com/guidance/ta1".to_string(),
///     title: "Example".to_string(),
///     reference: "TA1".to_string(),
///     published_date: String::new(),
///     last_updated: String::new(),
///     document_type: doc_type.to_string(),
///     programme: None,
/// };
///
/// let merged = merge(vec![
///     GuidanceRecord::new(entry("Guidance"), None),
///     GuidanceRecord::new(entry("NICE advice"), None),
/// ]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(
///     merged[0].document_types,
///     Some(vec!["Guidance".to_string(), "NICE advice".to_string()])
/// );
/// ```
pub fn merge(records: Vec<GuidanceRecord>) -> Vec<MergedRecord> {
    let before = records.len();
    let mut index: HashMap<String, usize> = HashMap::with_capacity(before);
    let mut merged: Vec<MergedRecord> = Vec::with_capacity(before);
    let mut duplicate_urls: HashMap<String, usize> = HashMap::new();

    for record in records {
        let GuidanceRecord { entry, contents } = record;

        if let Some(&position) = index.get(&entry.url) {
            let target = &mut merged[position];
            push_distinct(&mut target.document_types, Some(entry.document_type.as_str()));
            push_distinct(&mut target.programmes, entry.programme.as_deref());
            *duplicate_urls.entry(entry.url).or_insert(1) += 1;
            continue;
        }

        let mut document_types = None;
        push_distinct(&mut document_types, Some(entry.document_type.as_str()));
        let mut programmes = None;
        push_distinct(&mut programmes, entry.programme.as_deref());

        index.insert(entry.url.clone(), merged.len());
        merged.push(MergedRecord {
            url: entry.url,
            title: entry.title,
            reference: entry.reference,
            published_date: entry.published_date,
            last_updated: entry.last_updated,
            document_types,
            programmes,
            contents,
        });
    }

    tracing::info!(
        duplicate_urls = duplicate_urls.len(),
        before,
        after = merged.len(),
        "Merged duplicate guidance records"
    );
    for (url, count) in &duplicate_urls {
        tracing::debug!("{} appeared {} times", url, count);
    }

    merged
}

/// Appends `value` to the set if it is non-empty and not yet present
fn push_distinct(values: &mut Option<Vec<String>>, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };

    let list = values.get_or_insert_with(Vec::new);
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
