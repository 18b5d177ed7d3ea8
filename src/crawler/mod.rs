//! Crawler module for page scraping and crawl coordination
//!
//! This module contains the crawl pipeline, including:
//! - Single-page scraping in plain, pricing and SEO modes
//! - Sitemap-driven crawls with keyword filtering and category selection
//! - Bounded-concurrency scraping with per-page failure isolation

mod coordinator;
mod scraper;

pub use coordinator::{CategorySelection, CrawlCoordinator, CrawlPlan, CrawlReport, PageFailure};
pub use scraper::{PageScraper, DEFAULT_PAGE_TIMEOUT};
