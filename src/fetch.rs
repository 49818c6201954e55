//! Pricing feed retrieval
//!
//! `FeedFetcher` is the seam between the pricing pipeline and the network.
//! `HttpFetcher` is the real implementation; tests substitute an in-memory
//! fetcher so parsing and merging can be exercised without network access.
//!
//! Fetching is synchronous and single-shot: there is no retry and no caching.

use crate::config::HttpConfig;
use crate::error::{ConfigError, PricingError, Result};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Returns the raw (still padded) body of a pricing feed
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "http".to_string(),
                reason: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching pricing feed {}", url);

        let response = self.client.get(url).send().map_err(|e| PricingError::Fetch {
            url: url.to_string(),
            message: "request failed".to_string(),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
                source: None,
            });
        }

        let body = response.text().map_err(|e| PricingError::Fetch {
            url: url.to_string(),
            message: "failed to read response body".to_string(),
            source: Some(Box::new(e)),
        })?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Serves fixed bodies by URL. Unknown URLs fail like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

impl FeedFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| PricingError::Fetch {
                url: url.to_string(),
                message: "no such feed".to_string(),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_returns_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/pricing/1/ec2/linux-od.min.js")
            .with_status(200)
            .with_body("callback({\"config\":{\"regions\":[]}});")
            .create();

        let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
        let url = format!("{}/pricing/1/ec2/linux-od.min.js", server.url());
        let body = fetcher.fetch(&url).unwrap();

        assert!(body.starts_with("callback("));
        mock.assert();
    }

    #[test]
    fn test_http_fetcher_non_success_status_is_fetch_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing.js").with_status(404).create();

        let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing.js", server.url()))
            .unwrap_err();

        match err {
            PricingError::Fetch { message, .. } => assert!(message.contains("404")),
            other => panic!("Expected Fetch error, got: {:?}", other),
        }
    }

    #[test]
    fn test_http_fetcher_rejects_unusable_client_settings() {
        let http = HttpConfig {
            user_agent: "awspricing\nbroken".to_string(),
            ..Default::default()
        };

        match HttpFetcher::new(&http) {
            Err(PricingError::Config(err)) => assert!(err.to_string().contains("http")),
            other => panic!("Expected Config error, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_static_fetcher_unknown_url() {
        let fetcher = StaticFetcher::new().with("http://feeds.test/a.js", "{}");
        assert_eq!(fetcher.fetch("http://feeds.test/a.js").unwrap(), "{}");
        assert!(matches!(
            fetcher.fetch("http://feeds.test/b.js"),
            Err(PricingError::Fetch { .. })
        ));
    }
}
