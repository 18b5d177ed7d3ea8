//! Sitemap resolution
//!
//! Parses `<urlset>` and `<sitemapindex>` documents and flattens nested
//! indexes into a single list of page URLs.

mod parser;
mod resolver;

pub use parser::{parse_sitemap, SitemapDocument, SITEMAP_NAMESPACE};
pub use resolver::{
    SitemapFailure, SitemapResolution, SitemapResolver, DEFAULT_MAX_DEPTH, DEFAULT_SITEMAP_TIMEOUT,
};
