//! Single-page scraping
//!
//! Fetch, then hand the body to one extractor. The parsed document never
//! lives across an await point.

use crate::config::Config;
use crate::extract::{extract_meta_tags, ContentSanitizer, PricingExtractor, SeoScorer};
use crate::fetch::{FetchedBody, Fetcher};
use crate::html::{char_len, Document};
use crate::output::{PageRecord, PricingPage, SeoPage};
use crate::FetchError;
use chrono::Utc;
use std::time::Duration;
use url::Url;

/// Default page fetch timeout
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one URL and runs the sanitizer or one of the extractors on it
pub struct PageScraper<F: Fetcher> {
    fetcher: F,
    timeout: Duration,
    sanitizer: ContentSanitizer,
    pricing: PricingExtractor,
    seo: SeoScorer,
}

impl<F: Fetcher> PageScraper<F> {
    /// Creates a scraper with default extractors and timeout
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_PAGE_TIMEOUT,
            sanitizer: ContentSanitizer::default(),
            pricing: PricingExtractor::default(),
            seo: SeoScorer::new(),
        }
    }

    /// Creates a scraper using the page timeout and sanitizer thresholds
    /// from `config`
    pub fn from_config(fetcher: F, config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch.page_timeout_secs),
            sanitizer: ContentSanitizer::new(config.sanitizer.clone()),
            ..Self::new(fetcher)
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn with_pricing_extractor(mut self, pricing: PricingExtractor) -> Self {
        self.pricing = pricing;
        self
    }

    /// Scrapes a page into sanitized text
    ///
    /// # Returns
    ///
    /// * `Ok(PageRecord)` - Content plus raw and clean lengths
    /// * `Err(FetchError)` - The page could not be fetched
    pub async fn scrape(&self, url: &str) -> Result<PageRecord, FetchError> {
        let body = self.fetch(url).await?;
        let raw = body.text();
        let content = self.sanitizer.sanitize_html(&raw);

        tracing::info!(
            "Scraped {} ({} raw chars, {} clean chars)",
            url,
            char_len(&raw),
            char_len(&content)
        );

        Ok(PageRecord {
            url: url.to_string(),
            scraped_at: Utc::now(),
            raw_length: char_len(&raw),
            clean_length: char_len(&content),
            content,
        })
    }

    /// Scrapes a page for prices, plans and availability signals
    pub async fn scrape_pricing(&self, url: &str) -> Result<PricingPage, FetchError> {
        let requested = parse_page_url(url)?;
        let body = self.fetch(url).await?;
        let raw = body.text();

        let document = Document::parse(&raw);
        let page_url = effective_url(&body, requested);
        let (pricing, availability) = self.pricing.extract(&document, &page_url);

        tracing::info!(
            "Found {} prices and {} plans on {}",
            pricing.prices.len(),
            pricing.plans.len(),
            url
        );

        Ok(PricingPage {
            url: url.to_string(),
            scraped_at: Utc::now(),
            pricing,
            availability,
            raw_length: char_len(&raw),
        })
    }

    /// Scrapes a page for meta tags and the SEO report
    pub async fn scrape_seo(&self, url: &str) -> Result<SeoPage, FetchError> {
        let requested = parse_page_url(url)?;
        let body = self.fetch(url).await?;
        let raw = body.text();

        let document = Document::parse(&raw);
        let page_url = effective_url(&body, requested);
        let meta_tags = extract_meta_tags(&document);
        let seo_analysis = self.seo.score(&meta_tags, &document, &page_url);

        tracing::info!(
            "SEO score for {}: {} ({})",
            url,
            seo_analysis.score,
            seo_analysis.grade
        );

        Ok(SeoPage {
            url: url.to_string(),
            scraped_at: Utc::now(),
            meta_tags,
            seo_analysis,
            raw_length: char_len(&raw),
        })
    }

    async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        tracing::debug!("Fetching page: {}", url);
        self.fetcher.fetch(url, self.timeout).await
    }
}

fn parse_page_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
}

/// The post-redirect URL when it parses, otherwise the requested one
fn effective_url(body: &FetchedBody, requested: Url) -> Url {
    Url::parse(&body.final_url).unwrap_or(requested)
}
