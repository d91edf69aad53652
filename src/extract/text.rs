use scraper::ElementRef;

/// Collapses every run of whitespace (including newlines and tabs) to a
/// single space and trims the ends
///
/// # Examples
///
/// ```
/// use guidance_crawler::extract::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("Foo\n\n  Bar \t Baz"), "Foo Bar Baz");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the whitespace-normalized text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Returns true for `h1`..`h6`
pub fn is_heading(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    name.len() == 2 && name.starts_with('h') && name[1..].chars().all(|c| c.is_ascii_digit())
}

/// Renders a heading with the `### title ###` delimiter used to re-split sections
pub fn heading_marker(title: &str) -> String {
    format!("### {} ###", title)
}
