//! Pricing and availability extraction
//!
//! Pattern-driven: every finding comes from a regex table, never from
//! layout-specific scraping. Absence of a pattern yields an empty
//! collection, never an error.

use crate::extract::currency::{Currency, CurrencyHint, CurrencyTable};
use crate::html::{char_len, parse_selector, stripped_text, Document};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use url::Url;

/// Maximum number of price entries in a result
pub const MAX_PRICES: usize = 20;

/// Maximum number of plan descriptions in a result
pub const MAX_PLANS: usize = 10;

/// Plans shorter than this (in characters) are ignored
const MIN_PLAN_TEXT: usize = 10;

/// Exclusive upper bound on accepted amounts
const MAX_AMOUNT: f64 = 10_000.0;

/// Class and id substrings that mark plan/pricing cards
const PLAN_SELECTORS: &[&str] = &[
    r#"[class*="plan"]"#,
    r#"[class*="pricing"]"#,
    r#"[class*="tier"]"#,
    r#"[class*="package"]"#,
    r#"[class*="subscription"]"#,
    r#"[id*="plan"]"#,
    r#"[id*="pricing"]"#,
    r#"[id*="tier"]"#,
    r#"[id*="package"]"#,
    r#"[id*="subscription"]"#,
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static BILLING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?:per|/)\s*(month|year|mo|yr|annually|monthly)\b",
        r"\b(monthly|yearly|annual)\b",
        r"\b(billed\s+(?:monthly|yearly|annually))\b",
    ])
});

static DISCOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(\d+)%\s*(?:off|discount)",
        r"\bsave\s*(\d+)%",
        r"(\d+)\s*percent\s*(?:off|discount)",
    ])
});

static TRIAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(\d+)[\s-]*(day|week|month)s?\s*(?:free|trial)",
        r"\bfree\s*(?:trial|for)\s*(\d+)\s*(day|week|month)s?",
    ])
});

static PRICING_MODEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"contact\s*sales",
        r"request\s*(?:a\s*)?quote",
        r"custom\s*pricing",
        r"enterprise\s*pricing",
    ])
});

static SERVICE_STATUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"available\s*now|ready\s*for\s*deployment|live\s*service",
        r"coming\s*soon|\bbeta\b|\bpreview\b|early\s*access",
        r"contact\s*sales|request\s*(?:a\s*)?demo|schedule\s*(?:a\s*)?call",
        r"enterprise\s*ready|production\s*ready|\bscalable\b",
    ])
});

static DEPLOYMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bcloud\b|\bsaas\b|on-premises?|\bhybrid\b|self-hosted",
        r"api\s*access|\bsdk\b|\bintegration|\bwebhook",
        r"white-label|custom\s*deployment|\bdedicated\b",
    ])
});

static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"contact\s*sales|speak\s*to\s*sales|sales\s*team",
        r"request\s*(?:a\s*)?quote|get\s*(?:a\s*)?quote|custom\s*pricing",
        r"enterprise\s*contact|business\s*inquiry",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect()
}

/// A single detected price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub amount: f64,
    pub currency: Option<Currency>,
    pub source_pattern: String,
}

impl PriceEntry {
    /// Human-readable form: currency symbol followed by a two-decimal amount
    pub fn display(&self) -> String {
        match self.currency {
            Some(currency) => format!("{}{:.2}", currency.info().symbol, self.amount),
            None => format!("{:.2}", self.amount),
        }
    }
}

/// Pricing findings for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub prices: Vec<PriceEntry>,
    pub plans: Vec<String>,
    /// Primary currency: the first one observed in the text
    pub currency: Option<Currency>,
    pub currencies_found: Vec<Currency>,
    pub billing_periods: BTreeSet<String>,
    pub discounts: BTreeSet<String>,
    pub free_trials: BTreeSet<String>,
    pub pricing_models: BTreeSet<String>,
}

/// Service availability findings for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub service_status: BTreeSet<String>,
    pub deployment_options: BTreeSet<String>,
    pub contact_requirements: BTreeSet<String>,
}

/// Extracts prices, plans and availability signals from page content
#[derive(Debug, Clone, Default)]
pub struct PricingExtractor {
    table: CurrencyTable,
}

impl PricingExtractor {
    pub fn new(table: CurrencyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CurrencyTable {
        &self.table
    }

    /// Extracts pricing and availability from a parsed page
    ///
    /// Text patterns run against the page's visible text; plan names come
    /// from elements whose class marks them as plan or pricing cards.
    pub fn extract(&self, document: &Document, page_url: &Url) -> (PricingResult, AvailabilityResult) {
        let text = document.visible_text();
        let (mut pricing, availability) = self.extract_from_text(&text, page_url);
        pricing.plans = extract_plans(document);
        (pricing, availability)
    }

    /// Extracts pricing and availability from plain text (no plan names)
    pub fn extract_from_text(&self, text: &str, page_url: &Url) -> (PricingResult, AvailabilityResult) {
        let currencies_found = self.currencies_present(text);
        let pricing = PricingResult {
            prices: self.extract_prices(text),
            plans: Vec::new(),
            currency: currencies_found.first().copied(),
            currencies_found,
            billing_periods: collect_captures(&BILLING_PATTERNS, text, |caps| {
                caps.get(1).map(|m| normalize(m.as_str()))
            }),
            discounts: collect_captures(&DISCOUNT_PATTERNS, text, |caps| {
                caps.get(1).map(|m| format!("{}%", m.as_str()))
            }),
            free_trials: collect_captures(&TRIAL_PATTERNS, text, |caps| {
                let count = caps.get(1)?.as_str();
                let unit = caps.get(2)?.as_str().to_lowercase();
                Some(format!("{} {}", count, unit))
            }),
            pricing_models: collect_phrases(&PRICING_MODEL_PATTERNS, text),
        };

        let availability = AvailabilityResult {
            service_status: collect_phrases(&SERVICE_STATUS_PATTERNS, text),
            deployment_options: collect_phrases(&DEPLOYMENT_PATTERNS, text),
            contact_requirements: collect_phrases(&CONTACT_PATTERNS, text),
        };

        if pricing.prices.is_empty() {
            tracing::debug!("No prices found on {}", page_url);
        } else {
            tracing::debug!("Found {} prices on {}", pricing.prices.len(), page_url);
        }

        (pricing, availability)
    }

    /// Runs the price table in order, keeping the first entry per
    /// `(amount, currency)` pair, up to [`MAX_PRICES`]
    fn extract_prices(&self, text: &str) -> Vec<PriceEntry> {
        let mut seen: HashSet<(u64, Option<Currency>)> = HashSet::new();
        let mut prices = Vec::new();

        for pattern in &self.table.price_patterns {
            for caps in pattern.regex.captures_iter(text) {
                let Some(amount) = caps.name("amount").and_then(|m| parse_amount(m.as_str())) else {
                    continue;
                };
                if amount <= 0.0 || amount >= MAX_AMOUNT {
                    continue;
                }

                let currency = match pattern.hint {
                    CurrencyHint::Fixed(currency) => Some(currency),
                    CurrencyHint::FromSymbol => caps
                        .name("symbol")
                        .and_then(|m| Currency::from_symbol(m.as_str())),
                    CurrencyHint::Unknown => None,
                };

                if !seen.insert((amount.to_bits(), currency)) {
                    continue;
                }

                prices.push(PriceEntry {
                    amount,
                    currency,
                    source_pattern: pattern.source().to_string(),
                });
                if prices.len() >= MAX_PRICES {
                    return prices;
                }
            }
        }

        prices
    }

    /// Currencies present in the text, ordered by first occurrence
    fn currencies_present(&self, text: &str) -> Vec<Currency> {
        let mut found: Vec<(usize, usize, Currency)> = self
            .table
            .presence_patterns
            .iter()
            .enumerate()
            .filter_map(|(order, (currency, patterns))| {
                patterns
                    .iter()
                    .filter_map(|regex| regex.find(text).map(|m| m.start()))
                    .min()
                    .map(|position| (position, order, *currency))
            })
            .collect();
        found.sort();
        found.into_iter().map(|(_, _, currency)| currency).collect()
    }
}

/// Parses `1,299.00` style amounts
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Lowercases and collapses internal whitespace
fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_lowercase()
}

fn collect_phrases(patterns: &[Regex], text: &str) -> BTreeSet<String> {
    patterns
        .iter()
        .flat_map(|regex| regex.find_iter(text))
        .map(|m| normalize(m.as_str()))
        .collect()
}

fn collect_captures<F>(patterns: &[Regex], text: &str, f: F) -> BTreeSet<String>
where
    F: Fn(&Captures<'_>) -> Option<String>,
{
    patterns
        .iter()
        .flat_map(|regex| regex.captures_iter(text))
        .filter_map(|caps| f(&caps))
        .collect()
}

/// Text of plan/pricing cards, deduplicated in document order
fn extract_plans(document: &Document) -> Vec<String> {
    let mut plans: Vec<String> = Vec::new();

    for selector in PLAN_SELECTORS.iter().filter_map(|s| parse_selector(s)) {
        for element in document.html().select(&selector) {
            let text = WHITESPACE.replace_all(&stripped_text(element), " ").into_owned();
            if char_len(&text) <= MIN_PLAN_TEXT || plans.contains(&text) {
                continue;
            }
            plans.push(text);
            if plans.len() >= MAX_PLANS {
                return plans;
            }
        }
    }

    plans
}
