//! Fetching asset bytes
//!
//! [`AssetFetcher`] is the seam between the resolver and the network.
//! [`HttpFetcher`] is the production implementation; tests plug in their
//! own fetchers.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{AssetError, Result};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of asset bytes
///
/// Fetchers must be `Send + Sync`: one page's images are fetched
/// concurrently through a shared reference.
pub trait AssetFetcher: Send + Sync {
    /// Human-readable name of this fetcher
    fn name(&self) -> &'static str;

    /// Download the bytes behind `url`
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a bounded wait per request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client
    client: Client,
    /// Request timeout
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("notemark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AssetError::Client)?;

        Ok(Self { client, timeout })
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl AssetFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let map_err = |source: reqwest::Error| {
            if source.is_timeout() {
                AssetError::Timeout {
                    url: url.to_string(),
                }
            } else {
                AssetError::Http {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = self.client.get(url).send().map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().map_err(map_err)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_timeout() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
        assert_eq!(fetcher.name(), "http");
    }

    #[test]
    fn test_fetcher_default() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    #[ignore] // Requires network access
    fn test_fetch_remote_image() {
        let fetcher = HttpFetcher::new().unwrap();
        match fetcher.fetch("https://www.rust-lang.org/static/images/rust-logo-blk.svg") {
            Ok(bytes) => assert!(!bytes.is_empty()),
            Err(e) => eprintln!("Fetch test skipped (network error): {}", e),
        }
    }
}
