//! Content sanitizer
//!
//! Strips a page down to its meaningful prose. The passes run in a fixed
//! order, each one seeing the tree left behind by the previous pass:
//!
//! 1. Non-content nodes (`script`, `style`, `noscript`, `meta`, `link`) go unconditionally
//! 2. `nav`/`footer`/`header` go only when short AND link-dense
//! 3. Class/id-matched chrome (menus, banners, cookie popups, ...) goes only when short
//! 4. Elements with no text and no embedded image/vector go
//! 5. Text is gathered from content elements, then normalized and filtered by sentence

use crate::config::SanitizerConfig;
use crate::html::{char_len, parse_selector, stripped_text, Document};
use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Nodes that never carry page prose
const NON_CONTENT_TAGS: &str = "script, style, noscript, meta, link";

/// Structural elements subject to the link-density check
const STRUCTURAL_TAGS: &str = "nav, footer, header";

/// Class/id substring selectors for site chrome, in evaluation order
const CHROME_SELECTORS: &[&str] = &[
    r#"[class*="nav"]"#,
    r#"[class*="menu"]"#,
    r#"[class*="sidebar"]"#,
    r#"[class*="footer"]"#,
    r#"[class*="header"]"#,
    r#"[id*="nav"]"#,
    r#"[id*="menu"]"#,
    r#"[id*="sidebar"]"#,
    r#"[id*="footer"]"#,
    r#"[id*="header"]"#,
    r#"[class*="breadcrumb"]"#,
    r#"[class*="pagination"]"#,
    r#"[class*="social"]"#,
    r#"[class*="share"]"#,
    r#"[class*="cookie"]"#,
    r#"[class*="popup"]"#,
    r#"[class*="modal"]"#,
    r#"[class*="banner"]"#,
    r#"[class*="overlay"]"#,
];

/// Elements whose text is gathered into the output
const CONTENT_TAGS: &str =
    "h1, h2, h3, h4, h5, h6, p, div, span, li, td, th, article, section, main";

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static DOUBLE_PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\s*\.").unwrap());

/// Reduces HTML documents to readable prose
#[derive(Debug, Clone, Default)]
pub struct ContentSanitizer {
    config: SanitizerConfig,
}

impl ContentSanitizer {
    /// Creates a sanitizer with the given thresholds
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Convenience wrapper: parse raw HTML and sanitize it
    pub fn sanitize_html(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }
        self.sanitize(&Document::parse(raw))
    }

    /// Strips the document down to meaningful text
    ///
    /// Never fails. The input document is left untouched; the passes run on
    /// a private copy of the tree.
    pub fn sanitize(&self, document: &Document) -> String {
        if document.raw_len() == 0 {
            return String::new();
        }

        let mut html = document.html().clone();

        for id in matching_ids(&html, NON_CONTENT_TAGS) {
            detach(&mut html, id);
        }
        self.remove_structural_chrome(&mut html);
        self.remove_selector_chrome(&mut html);
        remove_empty_elements(&mut html);

        let collected = self.collect_text(&html);
        let cleaned = self.post_process(&collected);

        tracing::debug!(
            raw_len = document.raw_len(),
            clean_len = cleaned.len(),
            "Sanitized document"
        );

        cleaned
    }

    /// Normalizes whitespace and drops short sentence fragments
    pub fn post_process(&self, text: &str) -> String {
        let text = WHITESPACE_RE.replace_all(text, " ");
        let text = BLANK_LINES_RE.replace_all(&text, "\n\n");

        let sentences: Vec<&str> = SENTENCE_END_RE
            .split(&text)
            .map(str::trim)
            .filter(|s| char_len(s) > self.config.min_fragment_len)
            .collect();

        let joined = sentences.join(". ");
        let joined = WHITESPACE_RE.replace_all(&joined, " ");
        let joined = DOUBLE_PERIOD_RE.replace_all(&joined, ".");

        joined.trim().to_string()
    }

    /// Drops `nav`/`footer`/`header` elements that are short and mostly links
    fn remove_structural_chrome(&self, html: &mut Html) {
        let Some(link_selector) = parse_selector("a") else {
            return;
        };

        for id in matching_ids(html, STRUCTURAL_TAGS) {
            let Some(element) = attached_element(html, id) else {
                continue;
            };

            let text = stripped_text(element);
            let words = text.split_whitespace().count();
            let links = element.select(&link_selector).count();

            let short = char_len(&text) < self.config.structural_max_text;
            let link_dense = links as f64 > words as f64 * self.config.structural_link_density;

            if short && link_dense {
                tracing::trace!(tag = element.value().name(), links, words, "Removing navigation block");
                detach(html, id);
            }
        }
    }

    /// Drops class/id-matched chrome that carries almost no text
    fn remove_selector_chrome(&self, html: &mut Html) {
        for selector in CHROME_SELECTORS {
            for id in matching_ids(html, selector) {
                let Some(element) = attached_element(html, id) else {
                    continue;
                };

                if char_len(&stripped_text(element)) < self.config.selector_max_text {
                    detach(html, id);
                }
            }
        }
    }

    /// Gathers text from content elements, marking headings with blank lines
    fn collect_text(&self, html: &Html) -> String {
        let mut parts = Vec::new();

        if let Some(selector) = parse_selector(CONTENT_TAGS) {
            for element in html.select(&selector) {
                let text = stripped_text(element);
                if char_len(&text) <= self.config.min_element_text {
                    continue;
                }

                if is_heading(element.value().name()) {
                    parts.push(format!("\n{}\n", text));
                } else {
                    parts.push(text);
                }
            }
        }

        if parts.is_empty() {
            return html.root_element().text().collect();
        }

        parts.join(" ")
    }
}

/// Removes every element with no text and no `img`/`svg` beneath it
///
/// Elements are visited in document order, so a wrapper around an image is
/// judged before the image itself is removed.
fn remove_empty_elements(html: &mut Html) {
    for id in matching_ids(html, "*") {
        let Some(element) = attached_element(html, id) else {
            continue;
        };

        let has_text = element.text().any(|t| !t.trim().is_empty());
        let has_media = element.descendants().skip(1).any(|node| {
            node.value()
                .as_element()
                .map(|e| matches!(e.name(), "img" | "svg"))
                .unwrap_or(false)
        });

        if !has_text && !has_media {
            detach(html, id);
        }
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Node ids of all elements matching `selector`, in document order
fn matching_ids(html: &Html, selector: &str) -> Vec<NodeId> {
    parse_selector(selector)
        .map(|sel| html.select(&sel).map(|element| element.id()).collect())
        .unwrap_or_default()
}

/// The element behind `id`, unless it (or an ancestor) was already detached
fn attached_element(html: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    let root = html.tree.root().id();
    let node = html.tree.get(id)?;
    if node.ancestors().last().map(|a| a.id()) != Some(root) {
        return None;
    }
    ElementRef::wrap(node)
}

fn detach(html: &mut Html, id: NodeId) {
    if let Some(mut node) = html.tree.get_mut(id) {
        node.detach();
    }
}
