//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Classifying failures into page error kinds
//!
//! Every request is attempted exactly once.

use crate::config::CrawlConfig;
use crate::state::PageError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Upper bound on the connect phase of a request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML response
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// Response body decoded with the charset named by Content-Type
    /// (UTF-8 when none is given)
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use website_markdown::config::CrawlConfig;
/// use website_markdown::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .connect_timeout(config.request_timeout.min(CONNECT_TIMEOUT))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and validates the response
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure or timeout | `PageError::Fetch` |
/// | Status other than 200 | `PageError::HttpStatus` |
/// | Content-Type without `text/html` | `PageError::UnsupportedContentType` |
/// | Body cannot be read into text | `PageError::Parse` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, PageError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PageError::Fetch {
            message: describe_network_error(&e),
        })?;

    let status = response.status();
    let final_url = response.url().to_string();

    if status != StatusCode::OK {
        return Err(PageError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return Err(PageError::UnsupportedContentType { content_type });
    }

    let body = response.text().await.map_err(|e| PageError::Parse {
        message: format!("Failed to read document body: {}", e),
    })?;

    Ok(FetchedPage { final_url, body })
}

/// Renders a transport error, naming the common failure classes
fn describe_network_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Too many redirects: {}", error)
    } else {
        error.to_string()
    }
}
