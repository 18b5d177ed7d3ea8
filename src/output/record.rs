//! Persisted record shapes
//!
//! These are the structures handed to whatever stores company data. Field
//! names serialize to the keys of the company JSON document; nothing here
//! touches the filesystem.

use crate::extract::{AvailabilityResult, MetaTagSet, PricingResult, SeoReport};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sanitized content of one scraped page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub content: String,
    /// Characters in the fetched HTML
    #[serde(rename = "raw_content_length")]
    pub raw_length: usize,
    /// Characters in the sanitized content
    #[serde(rename = "clean_content_length")]
    pub clean_length: usize,
}

/// Pricing and availability findings for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPage {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub pricing: PricingResult,
    pub availability: AvailabilityResult,
    #[serde(rename = "raw_content_length")]
    pub raw_length: usize,
}

/// Meta tags and SEO report for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoPage {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub meta_tags: MetaTagSet,
    pub seo_analysis: SeoReport,
    #[serde(rename = "raw_content_length")]
    pub raw_length: usize,
}

/// A stored analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything collected about one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub homepage: Option<PageRecord>,
    #[serde(default)]
    pub features: IndexMap<String, PageRecord>,
    #[serde(default)]
    pub pricing_data: IndexMap<String, PricingPage>,
    #[serde(default)]
    pub seo_data: IndexMap<String, SeoPage>,
    #[serde(default)]
    pub analysis_results: IndexMap<String, AnalysisEntry>,
}

impl CompanyRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            created_at: Utc::now(),
            last_updated: None,
            homepage: None,
            features: IndexMap::new(),
            pricing_data: IndexMap::new(),
            seo_data: IndexMap::new(),
            analysis_results: IndexMap::new(),
        }
    }

    /// File-name stem used for this company's records
    pub fn slug(&self) -> String {
        company_slug(&self.company_name)
    }

    pub fn set_homepage(&mut self, page: PageRecord) {
        self.homepage = Some(page);
        self.touch();
    }

    /// Adds or replaces feature pages by page id
    pub fn merge_features(&mut self, pages: impl IntoIterator<Item = (String, PageRecord)>) {
        self.features.extend(pages);
        self.touch();
    }

    pub fn merge_pricing(&mut self, pages: impl IntoIterator<Item = (String, PricingPage)>) {
        self.pricing_data.extend(pages);
        self.touch();
    }

    pub fn merge_seo(&mut self, pages: impl IntoIterator<Item = (String, SeoPage)>) {
        self.seo_data.extend(pages);
        self.touch();
    }

    /// Stores an analysis result under `name`, replacing any previous one
    pub fn add_analysis(&mut self, name: impl Into<String>, result: impl Into<String>) {
        self.analysis_results.insert(
            name.into(),
            AnalysisEntry {
                result: result.into(),
                timestamp: Utc::now(),
            },
        );
        self.touch();
    }

    fn touch(&mut self) {
        self.last_updated = Some(Utc::now());
    }
}

/// Lowercases a company name and replaces spaces with underscores
pub fn company_slug(company_name: &str) -> String {
    company_name.to_lowercase().replace(' ', "_")
}
