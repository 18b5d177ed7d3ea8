//! Sitemap XML parsing
//!
//! Handles both `<urlset>` documents and `<sitemapindex>` documents. Element
//! names are matched on their local part so namespaced and un-namespaced
//! sitemaps parse the same way. Only a `<loc>` that is a direct child of its
//! `<url>`/`<sitemap>` counts; extension elements such as `<image:loc>` are
//! skipped.

use crate::SitemapError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Sitemap protocol namespace
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Entries found in one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<url><loc>` values, in document order
    pub urls: Vec<String>,
    /// `<sitemap><loc>` values of a sitemap index, in document order
    pub sitemaps: Vec<String>,
}

impl SitemapDocument {
    /// Returns true if the document references nested sitemaps
    pub fn is_index(&self) -> bool {
        !self.sitemaps.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Url,
    Sitemap,
}

/// Parses a sitemap or sitemap index
///
/// Fails with [`SitemapError::Parse`] when the XML is malformed, truncated
/// or has no root element.
pub fn parse_sitemap(xml: &str, source_url: &str) -> Result<SitemapDocument, SitemapError> {
    let parse_error = |message: String| SitemapError::Parse {
        url: source_url.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    let mut document = SitemapDocument::default();

    let mut depth: usize = 0;
    let mut saw_root = false;
    // Entry kind plus the depth of its opening tag
    let mut entry: Option<(Entry, usize)> = None;
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                match e.local_name().as_ref() {
                    b"url" if entry.is_none() => entry = Some((Entry::Url, depth)),
                    b"sitemap" if entry.is_none() => entry = Some((Entry::Sitemap, depth)),
                    b"loc" if matches!(entry, Some((_, d)) if depth == d + 1) => {
                        loc = Some(String::new())
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(_)) => saw_root = true,
            Ok(Event::Text(e)) => {
                if let Some(buffer) = loc.as_mut() {
                    let text = e.unescape().map_err(|e| parse_error(e.to_string()))?;
                    buffer.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(buffer) = loc.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let closing = depth;
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"loc" if matches!(entry, Some((_, d)) if closing == d + 1) => {
                        if let (Some((kind, _)), Some(value)) = (entry, loc.take()) {
                            let value = value.trim().to_string();
                            if !value.is_empty() {
                                match kind {
                                    Entry::Url => document.urls.push(value),
                                    Entry::Sitemap => document.sitemaps.push(value),
                                }
                            }
                        }
                    }
                    b"url" | b"sitemap" if matches!(entry, Some((_, d)) if closing == d) => {
                        entry = None
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(parse_error(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(parse_error("no root element".to_string()));
    }
    if depth != 0 {
        return Err(parse_error("unexpected end of document".to_string()));
    }

    Ok(document)
}
