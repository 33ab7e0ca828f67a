//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Links to follow on the next crawl level

use crate::url::{extract_host, is_file_link, normalize_url};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links discovered on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Normalized candidate links, unique within the page, in document order
    pub links: Vec<String>,

    /// Later occurrences of a link already present in `links`
    pub repeats: Vec<String>,
}

impl ExtractedLinks {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.repeats.is_empty()
    }
}

/// Parses a decoded response body into an HTML document
///
/// Parsing follows the HTML5 error-recovery rules, so any text yields a
/// document; malformed markup is repaired rather than rejected.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts the page title from the first `<title>` element
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use website_markdown::crawler::extract_title;
///
/// let document = Html::parse_document("<html><head><title> Docs </title></head></html>");
/// assert_eq!(extract_title(&document), Some("Docs".to_string()));
/// ```
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Produces the candidate links of a page
///
/// # Link Extraction Rules
///
/// For every `<a href="...">` with a non-empty href, in document order:
/// 1. Resolve the href against the page URL
/// 2. Drop anything that is not `http` or `https`
/// 3. Drop other hosts unless external links are followed
/// 4. Normalize
/// 5. Drop links already seen on this page (recorded as repeats)
/// 6. Drop links to documents, archives, media and assets
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_host: String,
    follow_external: bool,
}

impl LinkExtractor {
    /// Creates an extractor for a crawl rooted at `base_host`
    ///
    /// `base_host` is the host key of the seed URL as produced by
    /// [`crate::url::extract_host`].
    pub fn new(base_host: impl Into<String>, follow_external: bool) -> Self {
        Self {
            base_host: base_host.into(),
            follow_external,
        }
    }

    /// Extracts candidate links from a parsed document
    pub fn extract_links(&self, document: &Html, base_url: &Url) -> ExtractedLinks {
        let mut extracted = ExtractedLinks::default();

        let a_selector = match Selector::parse("a[href]") {
            Ok(selector) => selector,
            Err(_) => return extracted,
        };

        let mut seen = HashSet::new();

        for element in document.select(&a_selector) {
            let href = match element.value().attr("href") {
                Some(href) => href.trim(),
                None => continue,
            };

            if href.is_empty() {
                continue;
            }

            let resolved = match base_url.join(href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Skipping unresolvable link {}: {}", href, e);
                    continue;
                }
            };

            if resolved.scheme() != "http" && resolved.scheme() != "https" {
                continue;
            }

            if !self.follow_external && !self.is_same_host(&resolved) {
                tracing::trace!("Skipping external link {}", resolved);
                continue;
            }

            let normalized = normalize_url(resolved.as_str());
            let is_file = is_file_link(&normalized);

            if !seen.insert(normalized.clone()) {
                if !is_file {
                    extracted.repeats.push(normalized);
                }
                continue;
            }

            if is_file {
                tracing::trace!("Skipping file link {}", normalized);
                continue;
            }

            extracted.links.push(normalized);
        }

        extracted
    }

    fn is_same_host(&self, url: &Url) -> bool {
        extract_host(url).as_deref() == Some(self.base_host.as_str())
    }
}
