//! Page records produced by the crawl
//!
//! A page record is created once by a fetch-convert worker and never changes
//! afterwards. Failures keep their structured kind; the human-readable text
//! comes from `Display` and is only rendered at the output boundary.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use thiserror::Error;

/// Reason a single page could not be turned into markdown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Network or transport failure (DNS, connection, timeout)
    #[error("Failed to fetch page: {message}")]
    Fetch { message: String },

    /// The server answered with something other than 200
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response is not an HTML document
    #[error("Not an HTML page (Content-Type: {content_type})")]
    UnsupportedContentType { content_type: String },

    /// The body could not be read as an HTML document
    #[error("Failed to parse HTML: {message}")]
    Parse { message: String },

    /// The markdown converter rejected the document
    #[error("Failed to convert to markdown: {message}")]
    Conversion { message: String },
}

impl PageError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::HttpStatus { .. } => "httpStatus",
            Self::UnsupportedContentType { .. } => "unsupportedContentType",
            Self::Parse { .. } => "parse",
            Self::Conversion { .. } => "conversion",
        }
    }
}

/// A single crawled page
///
/// Serializes as `{url, title, markdown, depth}`; failed pages add `error`
/// (the rendered message) and `errorKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Normalized URL of the page
    pub url: String,

    /// Page title, or the URL when the page has none
    pub title: String,

    /// Cleaned markdown; empty for failed pages
    pub markdown: String,

    /// BFS level at which the page was fetched
    pub depth: u32,

    /// Present iff fetching, parsing or converting the page failed
    pub error: Option<PageError>,
}

impl Serialize for PageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.error.is_some() { 6 } else { 4 };
        let mut state = serializer.serialize_struct("PageRecord", fields)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("markdown", &self.markdown)?;
        state.serialize_field("depth", &self.depth)?;
        if let Some(error) = &self.error {
            state.serialize_field("error", &error.to_string())?;
            state.serialize_field("errorKind", error.kind())?;
        }
        state.end()
    }
}

impl PageRecord {
    /// Creates a record for a successfully converted page
    pub fn success(
        url: impl Into<String>,
        title: impl Into<String>,
        markdown: impl Into<String>,
        depth: u32,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            markdown: markdown.into(),
            depth,
            error: None,
        }
    }

    /// Creates a record for a page that failed
    pub fn failed(url: impl Into<String>, depth: u32, error: PageError) -> Self {
        let url = url.into();
        Self {
            title: url.clone(),
            url,
            markdown: String::new(),
            depth,
            error: Some(error),
        }
    }

    /// Returns true if this page failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of a complete crawl
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Kept pages, grouped by non-decreasing depth
    pub pages: Vec<PageRecord>,

    /// Number of discovered links that pointed at already claimed URLs
    pub duplicates: u64,

    /// True when the crawl stopped early because it was cancelled
    pub cancelled: bool,
}

impl CrawlResult {
    /// Number of pages converted successfully
    pub fn success_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_error()).count()
    }

    /// Number of pages recorded with an error
    pub fn error_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
