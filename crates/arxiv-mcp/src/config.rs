//! Configuration for the arXiv MCP server.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Query endpoint of the arXiv export API (Atom feed responses).
    pub const QUERY_API: &str = "http://export.arxiv.org/api/query";

    /// Base URL for PDF downloads.
    pub const PDF_BASE: &str = "https://arxiv.org/pdf";

    /// Base URL for rendered HTML papers.
    pub const HTML_BASE: &str = "https://arxiv.org/html";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Minimum spacing between query API calls (arXiv asks for one request every 3 seconds).
    pub const QUERY_INTERVAL: Duration = Duration::from_secs(3);

    /// Cache TTL for query responses (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cached query responses.
    pub const CACHE_MAX_SIZE: u64 = 200;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Default directory for images fetched by `get_image`.
pub const DEFAULT_IMAGE_DIR: &str = "downloaded";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Query API URL (overridable for mock servers).
    pub query_api_url: String,

    /// PDF base URL.
    pub pdf_base_url: String,

    /// HTML base URL.
    pub html_base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum spacing between query API calls.
    pub query_interval: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Where downloaded images are written.
    pub image_dir: PathBuf,

    /// Directory holding `API.md` and `WORKFLOW.md`.
    pub docs_dir: PathBuf,
}

impl Config {
    /// Create a configuration pointing at the public arXiv endpoints.
    #[must_use]
    pub fn new(image_dir: Option<PathBuf>, docs_dir: Option<PathBuf>) -> Self {
        Self {
            query_api_url: api::QUERY_API.to_string(),
            pdf_base_url: api::PDF_BASE.to_string(),
            html_base_url: api::HTML_BASE.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            query_interval: api::QUERY_INTERVAL,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            image_dir: image_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            docs_dir: docs_dir.unwrap_or_else(default_docs_dir),
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            query_api_url: format!("{}/api/query", base_url),
            pdf_base_url: format!("{}/pdf", base_url),
            html_base_url: format!("{}/html", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            query_interval: Duration::ZERO, // No spacing in tests
            cache_ttl: Duration::ZERO,      // No caching in tests
            cache_max_size: 0,
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            docs_dir: default_docs_dir(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ARXIV_MCP_IMAGE_DIR` and `ARXIV_MCP_DOCS_DIR`.
    pub fn from_env() -> anyhow::Result<Self> {
        let image_dir = std::env::var_os("ARXIV_MCP_IMAGE_DIR").map(PathBuf::from);
        let docs_dir = std::env::var_os("ARXIV_MCP_DOCS_DIR").map(PathBuf::from);
        Ok(Self::new(image_dir, docs_dir))
    }

    /// Check if query responses are cached.
    #[must_use]
    pub fn caching_enabled(&self) -> bool {
        self.cache_max_size > 0 && !self.cache_ttl.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// `docs/` at the repository root.
fn default_docs_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.query_api_url, api::QUERY_API);
        assert_eq!(config.image_dir, PathBuf::from("downloaded"));
        assert!(config.caching_enabled());
    }

    #[test]
    fn test_config_overrides_dirs() {
        let config = Config::new(Some(PathBuf::from("/tmp/figs")), Some(PathBuf::from("/srv/docs")));
        assert_eq!(config.image_dir, PathBuf::from("/tmp/figs"));
        assert_eq!(config.docs_dir, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_for_testing_disables_cache_and_spacing() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.query_api_url, "http://127.0.0.1:9999/api/query");
        assert_eq!(config.pdf_base_url, "http://127.0.0.1:9999/pdf");
        assert!(config.query_interval.is_zero());
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_default_docs_dir_has_resources() {
        let docs = default_docs_dir();
        assert!(docs.join("API.md").exists());
        assert!(docs.join("WORKFLOW.md").exists());
    }
}
