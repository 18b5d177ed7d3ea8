//! Content extraction
//!
//! Total functions over parsed pages: sanitized prose text, pricing and
//! availability signals, meta tags and the B2B SEO rubric. None of these
//! fail; missing data yields empty values.

pub mod currency;
pub mod meta;
pub mod pricing;
pub mod sanitizer;
pub mod seo;

pub use currency::{Currency, CurrencyHint, CurrencyInfo, CurrencyTable, PricePattern};
pub use meta::{extract_meta_tags, MetaTagSet};
pub use pricing::{AvailabilityResult, PriceEntry, PricingExtractor, PricingResult};
pub use sanitizer::ContentSanitizer;
pub use seo::{SeoGrade, SeoReport, SeoScorer};
