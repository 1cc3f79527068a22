//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from explicit configuration
//! - GET requests for listing and product pages
//! - GET requests for image assets, with an optional Referer header
//! - Error classification (transport, timeout, HTTP status)

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::header::REFERER;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - User agent and timeouts shared by every request
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::HttpConfig;
/// use catalog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a reqwest failure onto the crawler's error taxonomy
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `Timeout` |
/// | Non-success status | `HttpStatus` |
/// | Anything else (DNS, connect, body read) | `Transport` |
pub fn classify_error(url: &str, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = error.status() {
        HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        HarvestError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Issues GET requests on behalf of every crawler component
///
/// Cloning is cheap: the underlying client shares its connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, HarvestError> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a page and returns its body as text
    ///
    /// A non-success status is an error; the body of an error page is never
    /// handed to a parser.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, HarvestError> {
        let response = self.send(url, None).await?;
        response
            .text()
            .await
            .map_err(|e| classify_error(url.as_str(), e))
    }

    /// Sends a GET request and checks its status
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `referer` - Optional value for the `Referer` header
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - A response with a 2xx status, body not yet read
    /// * `Err(HarvestError)` - Transport failure, timeout, or non-success status
    pub async fn send(&self, url: &Url, referer: Option<&str>) -> Result<Response, HarvestError> {
        let mut request = self.client.get(url.clone());
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
