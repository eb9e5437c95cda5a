//! arXiv HTTP client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Spacing between query API calls, as arXiv requests
//! - Query response caching with 5-minute TTL
//!
//! The client never inspects query strings; callers validate them first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tokio::sync::Mutex;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Raw image bytes plus the server's declared content type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Response body.
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if sent.
    pub content_type: Option<String>,
}

/// arXiv API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query response cache, `None` when disabled.
    cache: Option<Cache<String, String>>,

    /// Query API URL.
    query_api_url: String,

    /// PDF base URL.
    pdf_base_url: String,

    /// HTML base URL.
    html_base_url: String,

    /// Minimum spacing between query API calls.
    query_interval: Duration,

    /// When the last query API call was issued.
    last_query: Arc<Mutex<Option<Instant>>>,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("arxiv-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(3);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.cache_max_size)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            client,
            cache,
            query_api_url: config.query_api_url.clone(),
            pdf_base_url: config.pdf_base_url.clone(),
            html_base_url: config.html_base_url.clone(),
            query_interval: config.query_interval,
            last_query: Arc::new(Mutex::new(None)),
        })
    }

    /// Full request URL for a raw query string.
    #[must_use]
    pub fn query_url(&self, raw_query: &str) -> String {
        format!("{}?{}", self.query_api_url, raw_query)
    }

    /// PDF URL for an identifier.
    #[must_use]
    pub fn pdf_url(&self, arxiv_id: &str) -> String {
        format!("{}/{}.pdf", self.pdf_base_url, arxiv_id)
    }

    /// HTML URL for an identifier.
    #[must_use]
    pub fn html_url(&self, arxiv_id: &str) -> String {
        format!("{}/{}", self.html_base_url, arxiv_id)
    }

    /// Run a query against the export API and return the Atom feed text.
    ///
    /// The query string is sent exactly as given.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn query(&self, raw_query: &str) -> ClientResult<String> {
        let url = self.query_url(raw_query);
        let cache_key = cache_key("GET", &url);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!(%url, "Query served from cache");
                return Ok(cached);
            }
        }

        self.wait_for_query_slot().await;

        tracing::info!(%url, "Sending query to arXiv");
        let response = self.send_get(&url).await?;
        let body = response.text().await?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, body.clone()).await;
        }

        Ok(body)
    }

    /// Download a paper PDF.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn fetch_pdf(&self, arxiv_id: &str) -> ClientResult<Vec<u8>> {
        let url = self.pdf_url(arxiv_id);
        tracing::info!(%url, "Downloading paper");

        let response = self.send_get(&url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the HTML rendering of a paper.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn fetch_html(&self, arxiv_id: &str) -> ClientResult<String> {
        let url = self.html_url(arxiv_id);
        tracing::info!(%url, "Fetching paper HTML");

        let response = self.send_get(&url).await?;
        Ok(response.text().await?)
    }

    /// Fetch an image from an arbitrary URL.
    ///
    /// # Errors
    ///
    /// Returns error on HTTP failure.
    pub async fn fetch_image(&self, url: &str) -> ClientResult<FetchedImage> {
        tracing::info!(%url, "Downloading image");

        let response = self.send_get(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedImage { bytes, content_type })
    }

    /// Block until the configured spacing since the previous query has passed.
    async fn wait_for_query_slot(&self) {
        if self.query_interval.is_zero() {
            return;
        }

        // Held across the sleep so concurrent queries queue up behind each other.
        let mut last = self.last_query.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.query_interval {
                tokio::time::sleep(self.query_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn send_get(&self, url: &str) -> ClientResult<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        handle_response(url, response).await
    }
}

/// Map non-success statuses to [`ClientError`].
async fn handle_response(url: &str, response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(api::QUERY_INTERVAL.as_secs());

            Err(ClientError::rate_limited(retry_after))
        }
        404 => Err(ClientError::not_found(url)),
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

/// Generate cache key.
fn cache_key(method: &str, url: &str) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());

    format!("{:x}", hasher.finalize())
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient")
            .field("query_api_url", &self.query_api_url)
            .field("caching", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_keep_raw_query() {
        let client = ArxivClient::new(&Config::default()).unwrap();
        assert_eq!(
            client.query_url("search_query=au:del_maestro+AND+ti:checkerboard"),
            "http://export.arxiv.org/api/query?search_query=au:del_maestro+AND+ti:checkerboard"
        );
        assert_eq!(client.pdf_url("math.GT/0309136v1"), "https://arxiv.org/pdf/math.GT/0309136v1.pdf");
        assert_eq!(client.html_url("2510.04618"), "https://arxiv.org/html/2510.04618");
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let a = cache_key("GET", "http://export.arxiv.org/api/query?id_list=2301.00001");
        let b = cache_key("GET", "http://export.arxiv.org/api/query?id_list=2301.00001");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, cache_key("GET", "http://export.arxiv.org/api/query?id_list=2301.00002"));
    }
}
