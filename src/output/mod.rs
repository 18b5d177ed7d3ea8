//! Output module for record shapes and crawl summaries
//!
//! This module handles:
//! - The JSON record structures a company's collected data is stored in
//! - Generating markdown summaries of crawl results

mod markdown;
mod record;

pub use markdown::format_crawl_summary;
pub use record::{company_slug, AnalysisEntry, CompanyRecord, PageRecord, PricingPage, SeoPage};
