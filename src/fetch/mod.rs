//! Fetch capability
//!
//! The sitemap resolver and page scraper never talk to the network directly;
//! they go through the [`Fetcher`] trait so the transport can be swapped
//! (reqwest in production, mock servers or in-memory stubs in tests).

mod http;

pub use http::{build_http_client, HttpFetcher};

use crate::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// Raw response body returned by a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Response body bytes
    pub body: Vec<u8>,
}

impl FetchedBody {
    /// Decodes the body as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body length in bytes
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true if the body is empty
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Capability for fetching raw bytes over HTTP
///
/// Implementations must map non-success statuses to [`FetchError::Http`]
/// and must honour the per-call timeout.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, failing if it does not complete within `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedBody, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedBody, FetchError> {
        (**self).fetch(url, timeout).await
    }
}

/// Prepends `https://` to URLs typed without a scheme
pub fn ensure_scheme(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
