//! HTML to markdown conversion
//!
//! The conversion itself is delegated to `htmd`; this module defines the
//! converter seam used by workers and the cleanup applied to its output.

use thiserror::Error;

/// Error reported by a markdown converter
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

/// Converts an HTML document to markdown
pub trait HtmlConverter: Send + Sync {
    fn convert(&self, html: &str) -> Result<String, ConversionError>;
}

/// Converter backed by the `htmd` crate
///
/// Scripts, styles and the document head are skipped so that only visible
/// content ends up in the markdown. The `htmd` converter is built once and
/// shared by every page of a crawl.
pub struct HtmdConverter {
    inner: htmd::HtmlToMarkdown,
}

impl HtmdConverter {
    pub fn new() -> Self {
        Self {
            inner: htmd::HtmlToMarkdown::builder()
                .skip_tags(vec!["head", "script", "style", "noscript"])
                .build(),
        }
    }
}

impl Default for HtmdConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConverter for HtmdConverter {
    fn convert(&self, html: &str) -> Result<String, ConversionError> {
        self.inner
            .convert(html)
            .map_err(|e| ConversionError(e.to_string()))
    }
}

/// Cleans converter output
///
/// Runs of three or more newlines collapse to exactly two, then leading and
/// trailing whitespace is trimmed.
///
/// # Example
///
/// ```
/// use website_markdown::crawler::clean_markdown;
///
/// assert_eq!(clean_markdown("\n\n# Title\n\n\n\n\nBody\n"), "# Title\n\nBody");
/// ```
pub fn clean_markdown(markdown: &str) -> String {
    let mut cleaned = String::with_capacity(markdown.len());
    let mut newlines = 0;

    for ch in markdown.chars() {
        if ch == '\n' {
            newlines += 1;
            continue;
        }

        push_newlines(&mut cleaned, newlines);
        newlines = 0;
        cleaned.push(ch);
    }
    push_newlines(&mut cleaned, newlines);

    cleaned.trim().to_string()
}

fn push_newlines(out: &mut String, count: usize) {
    for _ in 0..count.min(2) {
        out.push('\n');
    }
}
