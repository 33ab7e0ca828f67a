//! Fetch-convert worker
//!
//! Turns one frontier URL into a page outcome and the links found on it.

use crate::crawler::converter::{clean_markdown, HtmlConverter};
use crate::crawler::fetcher::{fetch_url, FetchedPage};
use crate::crawler::parser::{extract_title, parse_document, ExtractedLinks, LinkExtractor};
use crate::crawler::quality::is_minimal;
use crate::crawler::throttle::Throttle;
use crate::state::{PageError, PageRecord};
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// What a worker produced for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was converted and kept
    Converted {
        page: PageRecord,
        links: ExtractedLinks,
    },

    /// Fetching, parsing or converting failed
    Failed(PageRecord),

    /// The page was judged too thin to keep
    Minimal { url: String },
}

/// Everything a worker task needs, shared by all tasks of a crawl
pub struct Worker {
    client: Client,
    converter: Arc<dyn HtmlConverter>,
    links: LinkExtractor,
    throttle: Throttle,
    max_depth: u32,
}

impl Worker {
    pub fn new(
        client: Client,
        converter: Arc<dyn HtmlConverter>,
        links: LinkExtractor,
        throttle: Throttle,
        max_depth: u32,
    ) -> Self {
        Self {
            client,
            converter,
            links,
            throttle,
            max_depth,
        }
    }

    /// Fetches one URL and converts it to a page outcome
    ///
    /// # Processing Steps
    ///
    /// 1. Wait for the throttle, then GET the URL (single attempt)
    /// 2. Transport, status and content-type failures -> `Failed`
    /// 3. Parse the decoded body
    /// 4. Title from `<title>`, falling back to the URL
    /// 5. Re-serialize the document and convert it; failure -> `Failed`
    /// 6. Clean the markdown and apply the quality filter -> `Minimal`
    /// 7. Below the depth bound, extract links for the next level, resolved
    ///    against the URL the response came from after redirects
    pub async fn fetch_and_convert(&self, url: &str, depth: u32) -> PageOutcome {
        let fetched = {
            let _permit = self.throttle.acquire().await;
            tracing::debug!("Fetching (depth {}): {}", depth, url);
            fetch_url(&self.client, url).await
        };

        match fetched {
            Ok(page) => self.convert(url, depth, &page),
            Err(error) => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                PageOutcome::Failed(PageRecord::failed(url, depth, error))
            }
        }
    }

    /// Parses and converts a fetched body
    ///
    /// Kept synchronous: the parsed document is not `Send` and must never be
    /// held across an await point.
    fn convert(&self, url: &str, depth: u32, page: &FetchedPage) -> PageOutcome {
        let document = parse_document(&page.body);

        let title = extract_title(&document).unwrap_or_else(|| url.to_string());

        let markdown = match self.converter.convert(&document.html()) {
            Ok(markdown) => clean_markdown(&markdown),
            Err(e) => {
                tracing::warn!("Failed to convert {}: {}", url, e);
                let error = PageError::Conversion {
                    message: e.to_string(),
                };
                return PageOutcome::Failed(PageRecord {
                    title,
                    ..PageRecord::failed(url, depth, error)
                });
            }
        };

        if is_minimal(&title, &markdown, url) {
            tracing::info!("Skipping page with minimal content: {}", url);
            return PageOutcome::Minimal {
                url: url.to_string(),
            };
        }

        // Relative links resolve against the post-redirect URL, which keeps
        // the trailing slash that normalization strips
        let links = if depth < self.max_depth {
            match Url::parse(&page.final_url) {
                Ok(base_url) => self.links.extract_links(&document, &base_url),
                Err(e) => {
                    tracing::debug!("Cannot resolve links against {}: {}", page.final_url, e);
                    ExtractedLinks::default()
                }
            }
        } else {
            ExtractedLinks::default()
        };

        PageOutcome::Converted {
            page: PageRecord::success(url, title, markdown, depth),
            links,
        }
    }
}
