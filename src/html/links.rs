//! Link enumeration for parsed pages

use crate::html::{parse_selector, Document};
use url::Url;

/// Resolves every `<a href>` on the page to an absolute URL
///
/// # Link Rules
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only hrefs (same-page anchors)
/// - Anything that does not resolve to HTTP(S)
///
/// Relative hrefs are resolved against `base_url`, so they end up on the
/// page's own host.
pub fn page_links(document: &Document, base_url: &Url) -> Vec<Url> {
    let Some(selector) = parse_selector("a[href]") else {
        return Vec::new();
    };

    document
        .html()
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded (see [`page_links`]).
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}
