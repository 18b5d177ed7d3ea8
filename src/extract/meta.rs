//! Meta tag extraction

use crate::html::{parse_selector, Document};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search-engine and social metadata of a page
///
/// Missing string values are empty, mirroring how the tags are absent
/// rather than malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaTagSet {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub viewport: String,
    pub robots: String,
    pub canonical: String,
    /// `og:*` properties with the prefix stripped
    pub og_tags: BTreeMap<String, String>,
    /// `twitter:*` names with the prefix stripped
    pub twitter_tags: BTreeMap<String, String>,
    /// Parsed `application/ld+json` blocks
    pub schema_markup: Vec<serde_json::Value>,
    pub other_meta: BTreeMap<String, String>,
}

/// Collects title, named metas, Open Graph / Twitter tags, the canonical
/// link and JSON-LD structured data
pub fn extract_meta_tags(document: &Document) -> MetaTagSet {
    let mut tags = MetaTagSet {
        title: document.title().unwrap_or_default(),
        ..Default::default()
    };

    for meta in document.select_all("meta") {
        let element = meta.value();
        let name = element.attr("name").unwrap_or_default().to_lowercase();
        let property = element.attr("property").unwrap_or_default().to_lowercase();
        let content = element.attr("content").unwrap_or_default().to_string();

        match name.as_str() {
            "description" => tags.description = content,
            "keywords" => tags.keywords = content,
            "author" => tags.author = content,
            "viewport" => tags.viewport = content,
            "robots" => tags.robots = content,
            "canonical" => tags.canonical = content,
            _ => {
                if let Some(key) = property.strip_prefix("og:") {
                    tags.og_tags.insert(key.to_string(), content);
                } else if let Some(key) = name.strip_prefix("twitter:") {
                    tags.twitter_tags.insert(key.to_string(), content);
                } else if !name.is_empty() && !content.is_empty() {
                    tags.other_meta.insert(name, content);
                }
            }
        }
    }

    if let Some(href) = document
        .select_all(r#"link[rel="canonical"]"#)
        .first()
        .and_then(|link| link.value().attr("href"))
        .filter(|href| !href.is_empty())
    {
        tags.canonical = href.to_string();
    }

    if let Some(selector) = parse_selector(r#"script[type="application/ld+json"]"#) {
        for script in document.html().select(&selector) {
            let raw: String = script.text().collect();
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => tags.schema_markup.push(value),
                Err(e) => tracing::debug!("Skipping invalid JSON-LD block: {}", e),
            }
        }
    }

    tags
}
