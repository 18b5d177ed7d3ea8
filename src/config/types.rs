use serde::Deserialize;

/// Main configuration structure for Rival-Scope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for a single sitemap fetch (seconds)
    #[serde(rename = "sitemap-timeout-secs")]
    pub sitemap_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("RivalScope/{}", env!("CARGO_PKG_VERSION")),
            page_timeout_secs: 30,
            sitemap_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Sitemap crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Number of pages scraped at once (1 = strictly sequential)
    pub concurrency: usize,

    /// Maximum nesting depth followed through sitemap indexes
    #[serde(rename = "sitemap-max-depth")]
    pub sitemap_max_depth: usize,

    /// Default keyword filter applied when the caller supplies none
    pub keywords: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            sitemap_max_depth: 5,
            keywords: Vec::new(),
        }
    }
}

/// Thresholds controlling how aggressively the sanitizer strips markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// `nav`/`header`/`footer` elements with at least this much text are kept
    #[serde(rename = "structural-max-text")]
    pub structural_max_text: usize,

    /// Links-per-word ratio above which a short structural element is dropped
    #[serde(rename = "structural-link-density")]
    pub structural_link_density: f64,

    /// Class/id-matched chrome with at least this much text is kept
    #[serde(rename = "selector-max-text")]
    pub selector_max_text: usize,

    /// Sentence fragments of this length or shorter are discarded
    #[serde(rename = "min-fragment-len")]
    pub min_fragment_len: usize,

    /// Content elements whose text is this length or shorter are skipped
    #[serde(rename = "min-element-text")]
    pub min_element_text: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            structural_max_text: 100,
            structural_link_density: 0.5,
            selector_max_text: 30,
            min_fragment_len: 10,
            min_element_text: 2,
        }
    }
}
