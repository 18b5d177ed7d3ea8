//! Rival-Scope: competitor web content collection and scoring
//!
//! This crate resolves sitemaps into page URLs, classifies them, scrapes and
//! sanitizes page content, and runs heuristic pricing and B2B SEO extraction
//! over the result. Persistence and language-model analysis are left to the
//! caller; the crate only produces the record structures they consume.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod output;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Rival-Scope operations
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by the fetch capability
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised while resolving a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed sitemap XML at {url}: {message}")]
    Parse { url: String, message: String },
}

/// Errors raised by the text analysis collaborator
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis quota exceeded: {0}")]
    Quota(String),

    #[error("Analysis authentication failed: {0}")]
    Auth(String),

    #[error("No content available: {0}")]
    NoContent(String),

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("Analysis backend error: {0}")]
    Backend(String),
}

/// Result type alias for Rival-Scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use analysis::{run_analysis, DataSource, TextAnalyzer};
pub use config::Config;
pub use crawler::{CategorySelection, CrawlCoordinator, CrawlReport, PageScraper};
pub use extract::{
    AvailabilityResult, ContentSanitizer, Currency, MetaTagSet, PriceEntry, PricingExtractor,
    PricingResult, SeoGrade, SeoReport, SeoScorer,
};
pub use fetch::{Fetcher, HttpFetcher};
pub use html::Document;
pub use output::{CompanyRecord, PageRecord, PricingPage, SeoPage};
pub use sitemap::SitemapResolver;
pub use crate::url::{categorize_urls, derive_page_id, filter_urls, UrlCategory};
