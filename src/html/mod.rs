//! HTML document capability
//!
//! Thin layer over `scraper` used by every extractor:
//! - [`Document`] keeps the parsed tree together with the raw byte length
//! - text helpers mirror "visible text" semantics (trimmed fragments)
//! - link enumeration resolves hrefs against the page URL

mod links;

pub use links::{page_links, resolve_link};

use scraper::{ElementRef, Html, Selector};

const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// A parsed HTML page
///
/// `scraper::Html` is not `Send`, so a `Document` is built after the fetch
/// completes and dropped before the next await point.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    raw_len: usize,
}

impl Document {
    /// Parses raw HTML (never fails; malformed markup is repaired by the parser)
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
            raw_len: raw.len(),
        }
    }

    /// The underlying parsed tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Length of the raw markup in bytes
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    /// All text in the document, concatenated without separators
    pub fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Text nodes outside `<script>`, `<style>`, `<noscript>` and
    /// `<template>`, concatenated without separators
    pub fn visible_text(&self) -> String {
        let mut text = String::new();
        for node in self.html.root_element().descendants() {
            let Some(fragment) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
        text
    }

    /// Text of the first `<title>` element, trimmed
    pub fn title(&self) -> Option<String> {
        let selector = parse_selector("title")?;
        self.html
            .select(&selector)
            .next()
            .map(stripped_text)
            .filter(|s| !s.is_empty())
    }

    /// Elements matching a CSS selector; an invalid selector matches nothing
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(sel) => self.html.select(&sel).collect(),
            None => Vec::new(),
        }
    }
}

/// Parses a CSS selector, logging and discarding invalid ones
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::debug!("Invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}

/// Visible text of an element: each text node trimmed, blanks dropped,
/// remaining fragments joined with a single space
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character count (not byte count) of a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
