//! URL classification for Rival-Scope
//!
//! This module provides keyword filtering, category assignment and page-id
//! derivation for URLs discovered in sitemaps.

mod filter;
mod page_id;

pub use filter::{filter_urls, matches_keyword};
pub use page_id::derive_page_id;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page categories, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlCategory {
    Features,
    Products,
    Pricing,
    Customers,
    Faq,
    Api,
    Documentation,
    Other,
}

impl UrlCategory {
    /// Every category, in priority order
    pub const ALL: [UrlCategory; 8] = [
        Self::Features,
        Self::Products,
        Self::Pricing,
        Self::Customers,
        Self::Faq,
        Self::Api,
        Self::Documentation,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Features => "features",
            Self::Products => "products",
            Self::Pricing => "pricing",
            Self::Customers => "customers",
            Self::Faq => "faq",
            Self::Api => "api",
            Self::Documentation => "documentation",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for UrlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Ordered classification rules: the first rule with a token contained in
/// the lowercased URL wins
pub const CATEGORY_RULES: &[(UrlCategory, &[&str])] = &[
    (UrlCategory::Features, &["feature", "capability", "function"]),
    (UrlCategory::Products, &["product", "service", "solution"]),
    (UrlCategory::Pricing, &["pricing", "price", "cost", "plan"]),
    (
        UrlCategory::Customers,
        &[
            "customer",
            "customers",
            "case-study",
            "case-studies",
            "success-story",
            "success-stories",
            "testimonial",
            "testimonials",
            "stories",
            "client",
            "clients",
        ],
    ),
    (
        UrlCategory::Faq,
        &["faq", "frequently-asked-questions", "frequently-asked", "questions"],
    ),
    (UrlCategory::Api, &["api", "developer", "docs", "documentation"]),
    (UrlCategory::Documentation, &["doc", "guide", "tutorial", "help"]),
];

/// Assigns a URL to exactly one category
///
/// Rules are checked in [`CATEGORY_RULES`] order; a URL mentioning tokens of
/// several categories lands in the earliest one. URLs matching no rule are
/// [`UrlCategory::Other`].
///
/// # Examples
///
/// ```
/// use rival_scope::url::{categorize_url, UrlCategory};
///
/// assert_eq!(categorize_url("https://acme.test/pricing"), UrlCategory::Pricing);
/// assert_eq!(categorize_url("https://acme.test/features/pricing"), UrlCategory::Features);
/// assert_eq!(categorize_url("https://acme.test/about"), UrlCategory::Other);
/// ```
pub fn categorize_url(url: &str) -> UrlCategory {
    let lower = url.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| lower.contains(token)))
        .map(|(category, _)| *category)
        .unwrap_or(UrlCategory::Other)
}

/// Buckets URLs by category
///
/// Every category is present in the result (possibly empty), in priority
/// order, and each bucket keeps the input order of its URLs.
pub fn categorize_urls(urls: &[String]) -> IndexMap<UrlCategory, Vec<String>> {
    let mut buckets: IndexMap<UrlCategory, Vec<String>> =
        UrlCategory::ALL.into_iter().map(|c| (c, Vec::new())).collect();

    for url in urls {
        let category = categorize_url(url);
        tracing::debug!("{} -> {}", url, category);
        buckets.entry(category).or_default().push(url.clone());
    }

    buckets
}
