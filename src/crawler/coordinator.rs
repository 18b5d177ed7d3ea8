//! Crawl coordination
//!
//! Drives one crawl from a sitemap URL:
//! - Resolving the sitemap (and any nested indexes) into page URLs
//! - Filtering by keyword and bucketing by category
//! - Scraping the selected URLs with bounded concurrency
//! - Assembling the per-page results into a [`CrawlReport`]

use crate::config::Config;
use crate::crawler::scraper::PageScraper;
use crate::fetch::Fetcher;
use crate::output::PageRecord;
use crate::sitemap::{SitemapFailure, SitemapResolver};
use crate::url::{categorize_urls, derive_page_id, filter_urls, UrlCategory};
use crate::SitemapError;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Which categorized URLs a crawl scrapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorySelection {
    /// Every filtered URL, in sitemap order
    All,
    /// The listed buckets, concatenated in the given order
    Categories(Vec<UrlCategory>),
}

impl CategorySelection {
    /// API and documentation pages together
    pub fn api_and_docs() -> Self {
        Self::Categories(vec![UrlCategory::Api, UrlCategory::Documentation])
    }

    /// Picks the URLs to scrape
    ///
    /// A category listed twice contributes its URLs once.
    pub fn select(&self, filtered: &[String], buckets: &IndexMap<UrlCategory, Vec<String>>) -> Vec<String> {
        match self {
            Self::All => filtered.to_vec(),
            Self::Categories(categories) => {
                let mut seen = Vec::with_capacity(categories.len());
                let mut selected = Vec::new();
                for category in categories {
                    if seen.contains(category) {
                        continue;
                    }
                    seen.push(*category);
                    if let Some(urls) = buckets.get(category) {
                        selected.extend(urls.iter().cloned());
                    }
                }
                selected
            }
        }
    }
}

/// A page that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub url: String,
    pub error: String,
}

/// URLs discovered for a sitemap, before any page is scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlPlan {
    pub sitemap_url: String,
    /// Every URL the sitemap tree yielded
    pub all_urls: Vec<String>,
    /// URLs passing the keyword filter, in sitemap order
    pub filtered_urls: Vec<String>,
    /// Filtered URLs by category, every category present
    pub categories: IndexMap<UrlCategory, Vec<String>>,
    pub sitemap_failures: Vec<SitemapFailure>,
}

/// Outcome of a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub sitemap_url: String,
    pub total_urls: usize,
    pub filtered_urls: usize,
    /// URL count per category, every category present
    pub categories: IndexMap<UrlCategory, usize>,
    pub selected_urls: usize,
    /// Scraped pages by page id, in scrape order
    pub pages: IndexMap<String, PageRecord>,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<PageFailure>,
    pub sitemap_failures: Vec<SitemapFailure>,
}

/// Runs sitemap-driven crawls
pub struct CrawlCoordinator<F: Fetcher> {
    resolver: SitemapResolver<Arc<F>>,
    scraper: PageScraper<Arc<F>>,
    concurrency: usize,
}

impl<F: Fetcher> CrawlCoordinator<F> {
    /// Creates a coordinator sharing one fetcher between sitemap resolution
    /// and page scraping
    pub fn new(fetcher: F, config: &Config) -> Self {
        let fetcher = Arc::new(fetcher);
        let resolver = SitemapResolver::new(Arc::clone(&fetcher))
            .with_timeout(Duration::from_secs(config.fetch.sitemap_timeout_secs))
            .with_max_depth(config.crawl.sitemap_max_depth);

        Self {
            resolver,
            scraper: PageScraper::from_config(fetcher, config),
            concurrency: config.crawl.concurrency.max(1),
        }
    }

    /// Overrides the number of pages fetched at once (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn scraper(&self) -> &PageScraper<Arc<F>> {
        &self.scraper
    }

    /// Resolves, filters and categorizes without scraping anything
    pub async fn plan(&self, sitemap_url: &str, keywords: &[String]) -> Result<CrawlPlan, SitemapError> {
        let resolution = self.resolver.resolve(sitemap_url).await?;
        let filtered_urls = filter_urls(&resolution.urls, keywords);
        let categories = categorize_urls(&filtered_urls);

        for (category, urls) in &categories {
            if !urls.is_empty() {
                tracing::info!("  {}: {} URLs", category, urls.len());
            }
        }

        Ok(CrawlPlan {
            sitemap_url: sitemap_url.to_string(),
            all_urls: resolution.urls,
            filtered_urls,
            categories,
            sitemap_failures: resolution.failures,
        })
    }

    /// Runs a full crawl: plan, select, then scrape
    ///
    /// # Arguments
    ///
    /// * `sitemap_url` - Root sitemap or sitemap index
    /// * `keywords` - Keyword filter; empty keeps every URL
    /// * `selection` - Which categories to scrape
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Always, once the root sitemap was fetched;
    ///   page failures are counted in the report
    /// * `Err(SitemapError)` - The root sitemap could not be fetched
    pub async fn run(
        &self,
        sitemap_url: &str,
        keywords: &[String],
        selection: &CategorySelection,
    ) -> Result<CrawlReport, SitemapError> {
        let plan = self.plan(sitemap_url, keywords).await?;
        let selected = selection.select(&plan.filtered_urls, &plan.categories);

        if selected.is_empty() {
            tracing::warn!("No URLs selected for scraping from {}", sitemap_url);
        }

        let (pages, failures) = self.scrape_all(&selected).await;
        let succeeded = selected.len() - failures.len();

        tracing::info!(
            "Crawl of {} finished: {} succeeded, {} failed",
            sitemap_url,
            succeeded,
            failures.len()
        );

        Ok(CrawlReport {
            sitemap_url: plan.sitemap_url,
            total_urls: plan.all_urls.len(),
            filtered_urls: plan.filtered_urls.len(),
            categories: plan
                .categories
                .iter()
                .map(|(category, urls)| (*category, urls.len()))
                .collect(),
            selected_urls: selected.len(),
            pages,
            succeeded,
            failed: failures.len(),
            failures,
            sitemap_failures: plan.sitemap_failures,
        })
    }

    /// Scrapes `urls`, keeping results in input order
    ///
    /// At most `concurrency` fetches are in flight; a failed page is
    /// recorded and does not affect the others. Pages sharing a page id
    /// keep the later result.
    pub async fn scrape_all(&self, urls: &[String]) -> (IndexMap<String, PageRecord>, Vec<PageFailure>) {
        let total = urls.len();
        let scraper = &self.scraper;

        let results: Vec<_> = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move {
                tracing::info!("[{}/{}] Scraping: {}", index + 1, total, url);
                (url, scraper.scrape(url).await)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut pages = IndexMap::new();
        let mut failures = Vec::new();

        for (url, result) in results {
            match result {
                Ok(record) => {
                    pages.insert(derive_page_id(url), record);
                }
                Err(e) => {
                    tracing::warn!("Failed to scrape {}: {}", url, e);
                    failures.push(PageFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        (pages, failures)
    }
}
