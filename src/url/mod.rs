//! URL handling module for Website-Markdown
//!
//! This module provides URL normalization, host extraction, seed validation
//! and file-type exclusion.

mod domain;
mod filetype;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::extract_host;
pub use filetype::is_file_link;
pub use normalize::normalize_url;

/// Parses and validates the URL a crawl starts from
///
/// The seed must be an absolute `http` or `https` URL with a host. This is the
/// only URL check that can abort a crawl; every other URL problem is recorded
/// on the page it concerns.
///
/// # Examples
///
/// ```
/// use website_markdown::url::parse_seed;
///
/// assert!(parse_seed("https://example.com/docs").is_ok());
/// assert!(parse_seed("not a url").is_err());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|source| UrlError::Parse {
        url: raw.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    Ok(url)
}
