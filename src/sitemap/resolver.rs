//! Recursive sitemap resolution

use crate::fetch::Fetcher;
use crate::sitemap::parser::parse_sitemap;
use crate::SitemapError;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Default nested sitemap-index depth
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Default per-sitemap fetch timeout
pub const DEFAULT_SITEMAP_TIMEOUT: Duration = Duration::from_secs(30);

/// A sitemap branch that was skipped or failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapFailure {
    pub url: String,
    pub reason: String,
}

/// Flattened result of resolving a sitemap tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapResolution {
    /// Page URLs: each document's own entries first, then its nested
    /// sitemaps in the order they are listed
    pub urls: Vec<String>,
    /// Branches that could not be resolved
    pub failures: Vec<SitemapFailure>,
}

#[derive(Default)]
struct ResolveState {
    visited: HashSet<String>,
    failures: Vec<SitemapFailure>,
}

impl ResolveState {
    fn fail(&mut self, url: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!("Skipping sitemap {}: {}", url, reason);
        self.failures.push(SitemapFailure {
            url: url.to_string(),
            reason,
        });
    }
}

/// Fetches a sitemap and flattens any sitemap-index tree beneath it
///
/// Nested sitemaps are fetched one at a time. A failing branch is recorded
/// and skipped; its siblings are still resolved. Each sitemap URL is fetched
/// at most once per resolution and nesting stops at `max_depth`.
pub struct SitemapResolver<F: Fetcher> {
    fetcher: F,
    timeout: Duration,
    max_depth: usize,
}

impl<F: Fetcher> SitemapResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_SITEMAP_TIMEOUT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolves `sitemap_url` into page URLs
    ///
    /// # Returns
    ///
    /// * `Ok(resolution)` - URLs from every reachable branch; a malformed
    ///   root document yields no URLs and one recorded failure
    /// * `Err(SitemapError::Fetch)` - The root sitemap could not be fetched
    pub async fn resolve(&self, sitemap_url: &str) -> Result<SitemapResolution, SitemapError> {
        let mut state = ResolveState::default();
        state.visited.insert(sitemap_url.to_string());

        let urls = match self.resolve_branch(sitemap_url.to_string(), 0, &mut state).await {
            Ok(urls) => urls,
            Err(e @ SitemapError::Parse { .. }) => {
                state.fail(sitemap_url, e.to_string());
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Found {} URLs in sitemap {}", urls.len(), sitemap_url);

        Ok(SitemapResolution {
            urls,
            failures: state.failures,
        })
    }

    fn resolve_branch<'a>(
        &'a self,
        url: String,
        depth: usize,
        state: &'a mut ResolveState,
    ) -> BoxFuture<'a, Result<Vec<String>, SitemapError>> {
        async move {
            tracing::info!("Fetching sitemap: {}", url);
            let body = self.fetcher.fetch(&url, self.timeout).await?;
            tracing::debug!("Sitemap fetched ({} bytes)", body.len());

            let document = parse_sitemap(&body.text(), &url)?;
            let mut urls = document.urls;

            for child in document.sitemaps {
                if depth + 1 > self.max_depth {
                    state.fail(&child, format!("nesting exceeds depth limit {}", self.max_depth));
                    continue;
                }
                if !state.visited.insert(child.clone()) {
                    state.fail(&child, "already visited");
                    continue;
                }

                match self.resolve_branch(child.clone(), depth + 1, &mut *state).await {
                    Ok(mut nested) => urls.append(&mut nested),
                    Err(e) => state.fail(&child, e.to_string()),
                }
            }

            Ok(urls)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedBody;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory fetcher that records every request
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedBody, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(FetchedBody {
                    final_url: url.to_string(),
                    status: 200,
                    content_type: Some("application/xml".to_string()),
                    body: body.as_bytes().to_vec(),
                }),
                None => Err(FetchError::Http {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn urlset(urls: &[&str]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(r#"<urlset xmlns="{}">{}</urlset>"#, crate::sitemap::SITEMAP_NAMESPACE, entries)
    }

    fn index(children: &[&str]) -> String {
        let entries: String = children
            .iter()
            .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
            .collect();
        format!("<sitemapindex>{}</sitemapindex>", entries)
    }

    #[tokio::test]
    async fn test_index_flattens_children() {
        let fetcher = MapFetcher::default()
            .with("s/index.xml", &index(&["s/a.xml", "s/b.xml"]))
            .with("s/a.xml", &urlset(&["a1", "a2", "a3"]))
            .with("s/b.xml", &urlset(&["b1", "b2"]));
        let resolution = SitemapResolver::new(fetcher).resolve("s/index.xml").await.unwrap();
        assert_eq!(resolution.urls, vec!["a1", "a2", "a3", "b1", "b2"]);
        assert!(resolution.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_child_does_not_abort_siblings() {
        let fetcher = MapFetcher::default()
            .with("s/index.xml", &index(&["s/missing.xml", "s/b.xml", "s/bad.xml"]))
            .with("s/b.xml", &urlset(&["b1"]))
            .with("s/bad.xml", "<urlset><url>");
        let resolution = SitemapResolver::new(fetcher).resolve("s/index.xml").await.unwrap();
        assert_eq!(resolution.urls, vec!["b1"]);
        let failed: Vec<_> = resolution.failures.iter().map(|f| f.url.as_str()).collect();
        assert_eq!(failed, vec!["s/missing.xml", "s/bad.xml"]);
    }

    #[tokio::test]
    async fn test_root_fetch_failure_is_error() {
        let resolver = SitemapResolver::new(MapFetcher::default());
        let err = resolver.resolve("s/nowhere.xml").await.unwrap_err();
        assert!(matches!(err, SitemapError::Fetch(FetchError::Http { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_malformed_root_yields_empty_list() {
        let fetcher = MapFetcher::default().with("s/root.xml", "not xml");
        let resolution = SitemapResolver::new(fetcher).resolve("s/root.xml").await.unwrap();
        assert!(resolution.urls.is_empty());
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(resolution.failures[0].url, "s/root.xml");
    }

    #[tokio::test]
    async fn test_cycle_is_fetched_once() {
        let fetcher = MapFetcher::default()
            .with("s/a.xml", &index(&["s/b.xml"]))
            .with("s/b.xml", &index(&["s/a.xml"]));
        let resolver = SitemapResolver::new(fetcher);
        let resolution = resolver.resolve("s/a.xml").await.unwrap();
        assert!(resolution.urls.is_empty());
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(resolution.failures[0].reason, "already visited");
        assert_eq!(resolver.fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let fetcher = MapFetcher::default()
            .with("s/0.xml", &index(&["s/1.xml"]))
            .with("s/1.xml", &index(&["s/2.xml"]))
            .with("s/2.xml", &urlset(&["deep"]));
        let resolver = SitemapResolver::new(fetcher).with_max_depth(1);
        let resolution = resolver.resolve("s/0.xml").await.unwrap();
        assert!(resolution.urls.is_empty());
        assert_eq!(resolution.failures[0].url, "s/2.xml");
        assert_eq!(resolver.fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mixed_document_keeps_own_urls_first() {
        let fetcher = MapFetcher::default()
            .with(
                "s/mixed.xml",
                "<urlset><sitemap><loc>s/child.xml</loc></sitemap><url><loc>own</loc></url></urlset>",
            )
            .with("s/child.xml", &urlset(&["nested"]));
        let resolution = SitemapResolver::new(fetcher).resolve("s/mixed.xml").await.unwrap();
        assert_eq!(resolution.urls, vec!["own", "nested"]);
    }
}
