//! B2B-oriented SEO scoring
//!
//! A fixed rubric of independent checks. Each check adds points when it
//! passes and usually a recommendation when it does not; the report is a
//! pure function of its inputs.

use crate::extract::meta::MetaTagSet;
use crate::html::{char_len, page_links, Document};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Highest achievable score
pub const MAX_SCORE: u32 = 100;

/// Pages at or above this many raw bytes lose the page-size points
pub const MAX_PAGE_BYTES: usize = 500_000;

const TITLE_KEYWORDS: &[&str] = &[
    "enterprise",
    "business",
    "professional",
    "solution",
    "platform",
    "api",
    "integration",
];

const DESCRIPTION_VALUE_PROPS: &[&str] = &[
    "enterprise",
    "scalable",
    "secure",
    "integration",
    "api",
    "automation",
    "efficiency",
];

const SECTION_KEYWORDS: &[&str] = &[
    "features",
    "pricing",
    "enterprise",
    "api",
    "integration",
    "security",
    "compliance",
];

const TRUST_SIGNALS: &[&str] = &[
    "security",
    "compliance",
    "soc2",
    "iso",
    "gdpr",
    "hipaa",
    "enterprise",
    "certified",
];

const REQUIRED_OG_TAGS: &[&str] = &["title", "description", "image", "url"];

/// Letter grade derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeoGrade {
    A,
    B,
    C,
    D,
    F,
}

impl SeoGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => Self::A,
            s if s >= 80 => Self::B,
            s if s >= 70 => Self::C,
            s if s >= 60 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for SeoGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Result of scoring one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    pub score: u32,
    pub grade: SeoGrade,
    pub factors: BTreeMap<String, Value>,
    pub recommendations: Vec<String>,
    pub b2b_indicators: BTreeMap<String, u32>,
}

/// Running state while checks are applied
#[derive(Default)]
struct Tally {
    points: f64,
    factors: BTreeMap<String, Value>,
    recommendations: Vec<String>,
    b2b_indicators: BTreeMap<String, u32>,
}

impl Tally {
    fn factor(&mut self, key: &str, value: impl Into<Value>) {
        self.factors.insert(key.to_string(), value.into());
    }

    fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }

    fn indicator(&mut self, key: &str, count: usize) {
        self.b2b_indicators.insert(key.to_string(), count as u32);
    }
}

/// Computes the B2B SEO rubric
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoScorer;

impl SeoScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a page
    ///
    /// # Arguments
    ///
    /// * `meta` - Tags extracted from `document`
    /// * `document` - The parsed page
    /// * `page_url` - URL the page was fetched from, used to split internal
    ///   and external links
    ///
    /// # Returns
    ///
    /// A report whose score is in `0..=100` and whose grade follows from it
    pub fn score(&self, meta: &MetaTagSet, document: &Document, page_url: &Url) -> SeoReport {
        let mut tally = Tally::default();

        check_title(&mut tally, &meta.title);
        check_description(&mut tally, &meta.description);
        check_headings(&mut tally, document);
        check_trust_signals(&mut tally, document);
        check_links(&mut tally, document, page_url);
        check_open_graph(&mut tally, meta);
        check_twitter(&mut tally, meta);
        check_structured_data(&mut tally, meta);
        check_page_size(&mut tally, document.raw_len());
        check_viewport(&mut tally, &meta.viewport);

        let score = tally.points.min(MAX_SCORE as f64).max(0.0).floor() as u32;
        tracing::debug!("SEO score for {}: {}", page_url, score);

        SeoReport {
            score,
            grade: SeoGrade::from_score(score),
            factors: tally.factors,
            recommendations: tally.recommendations,
            b2b_indicators: tally.b2b_indicators,
        }
    }
}

fn count_matches(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|needle| haystack.contains(*needle)).count()
}

fn check_title(tally: &mut Tally, title: &str) {
    if title.is_empty() {
        tally.factor("has_title", false);
        tally.recommend("Missing title tag");
        return;
    }

    let length = char_len(title);
    tally.points += 15.0;
    tally.factor("has_title", true);
    tally.factor("title_length", length);

    let keyword_count = count_matches(&title.to_lowercase(), TITLE_KEYWORDS);
    tally.indicator("b2b_keywords_in_title", keyword_count);
    if keyword_count > 0 {
        tally.points += 10.0;
        tally.factor("has_b2b_keywords", true);
    } else {
        tally.recommend("Consider adding B2B keywords to title (enterprise, business, solution, etc.)");
    }

    if (30..=60).contains(&length) {
        tally.points += 5.0;
        tally.factor("title_length_optimal", true);
    } else {
        tally.recommend(format!("Title length ({} chars) should be 30-60 characters", length));
    }
}

fn check_description(tally: &mut Tally, description: &str) {
    if description.is_empty() {
        tally.factor("has_description", false);
        tally.recommend("Missing meta description");
        return;
    }

    let length = char_len(description);
    tally.points += 15.0;
    tally.factor("has_description", true);
    tally.factor("description_length", length);

    let value_count = count_matches(&description.to_lowercase(), DESCRIPTION_VALUE_PROPS);
    tally.indicator("b2b_value_props_in_description", value_count);
    if value_count > 0 {
        tally.points += 5.0;
        tally.factor("has_b2b_value_props", true);
    } else {
        tally.recommend("Consider adding B2B value propositions to description");
    }

    // Recommendation only; no points
    if (120..=160).contains(&length) {
        tally.factor("description_length_optimal", true);
    } else {
        tally.recommend(format!(
            "Meta description length ({} chars) should be 120-160 characters",
            length
        ));
    }
}

fn check_headings(tally: &mut Tally, document: &Document) {
    let headings = document.select_all("h1, h2, h3, h4, h5, h6");
    let h1_count = document.select_all("h1").len();

    match h1_count {
        1 => {
            tally.points += 10.0;
            tally.factor("single_h1", true);
        }
        0 => tally.recommend("Missing H1 tag"),
        n => tally.recommend(format!("Multiple H1 tags found ({})", n)),
    }

    let heading_text = headings
        .iter()
        .map(|h| h.text().collect::<String>().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let section_count = count_matches(&heading_text, SECTION_KEYWORDS);
    tally.indicator("b2b_sections_found", section_count);
    if section_count >= 3 {
        tally.points += 5.0;
        tally.factor("good_b2b_structure", true);
    } else {
        tally.recommend("Consider adding more B2B-focused content sections");
    }

    tally.factor("total_headings", headings.len());
    tally.factor("h1_count", h1_count);
}

fn check_trust_signals(tally: &mut Tally, document: &Document) {
    let page_text = document.visible_text().to_lowercase();
    let signal_count = count_matches(&page_text, TRUST_SIGNALS);
    tally.indicator("trust_signals_found", signal_count);
    if signal_count >= 2 {
        tally.points += 10.0;
        tally.factor("good_trust_signals", true);
    } else {
        tally.recommend("Consider adding more trust signals (security, compliance, certifications)");
    }
    tally.factor("trust_signals_count", signal_count);
}

/// Links resolving to the page's host are internal; everything else that
/// resolves to HTTP(S) is external
fn check_links(tally: &mut Tally, document: &Document, page_url: &Url) {
    let (internal, external): (Vec<Url>, Vec<Url>) = page_links(document, page_url)
        .into_iter()
        .partition(|link| link.host_str() == page_url.host_str());

    tally.factor("internal_links", internal.len());
    tally.factor("external_links", external.len());

    if internal.len() >= 5 {
        tally.points += 5.0;
        tally.factor("good_internal_linking", true);
    } else {
        tally.recommend("Add more internal links");
    }

    if external.len() >= 2 {
        tally.points += 5.0;
        tally.factor("good_external_linking", true);
    } else {
        tally.recommend("Add more external links for authority");
    }
}

fn check_open_graph(tally: &mut Tally, meta: &MetaTagSet) {
    let present = |tag: &str| meta.og_tags.get(tag).is_some_and(|v| !v.is_empty());

    let og_score = REQUIRED_OG_TAGS.iter().filter(|tag| present(**tag)).count() as f64 * 2.5;
    tally.points += og_score;
    tally.factor("og_tags_score", og_score);
    tally.factor("og_tags_present", json!(meta.og_tags.keys().collect::<Vec<_>>()));

    if og_score < 10.0 {
        let missing: Vec<&str> = REQUIRED_OG_TAGS
            .iter()
            .filter(|tag| !present(**tag))
            .copied()
            .collect();
        tally.recommend(format!("Missing Open Graph tags: {}", missing.join(", ")));
    }
}

fn check_twitter(tally: &mut Tally, meta: &MetaTagSet) {
    if meta.twitter_tags.is_empty() {
        tally.recommend("Add Twitter Card meta tags");
        return;
    }
    tally.points += 5.0;
    tally.factor("has_twitter_cards", true);
    tally.factor(
        "twitter_tags_present",
        json!(meta.twitter_tags.keys().collect::<Vec<_>>()),
    );
}

fn check_structured_data(tally: &mut Tally, meta: &MetaTagSet) {
    if meta.schema_markup.is_empty() {
        tally.recommend("Add structured data (Schema.org markup)");
        return;
    }
    tally.points += 5.0;
    tally.factor("has_schema_markup", true);

    let types: Vec<Value> = meta
        .schema_markup
        .iter()
        .map(|schema| {
            schema
                .get("@type")
                .cloned()
                .unwrap_or_else(|| Value::String("Unknown".to_string()))
        })
        .collect();
    tally.factor("schema_types", types);
}

fn check_page_size(tally: &mut Tally, raw_len: usize) {
    if raw_len < MAX_PAGE_BYTES {
        tally.points += 5.0;
        tally.factor("reasonable_page_size", true);
    } else {
        tally.recommend("Page size is large, consider optimization");
    }
    tally.factor("page_size_bytes", raw_len);
}

fn check_viewport(tally: &mut Tally, viewport: &str) {
    if viewport.contains("width=device-width") {
        tally.points += 5.0;
        tally.factor("mobile_friendly", true);
    } else {
        tally.recommend("Add responsive viewport meta tag");
    }
}
