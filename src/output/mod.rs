//! Output module for writing crawl results
//!
//! This module handles:
//! - Writing pages as per-page markdown files, one markdown document, or JSON
//! - Naming output files after the crawled site
//! - Summarizing crawl statistics

mod json;
mod markdown;
mod naming;
pub mod stats;
mod traits;

pub use json::JsonWriter;
pub use markdown::{format_page_document, format_single_document, FilesWriter, SingleFileWriter};
pub use naming::{generate_filename, sanitize_filename};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, OutputWriter, WriteReport};

use crate::state::PageRecord;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// How crawl results are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One markdown file per page
    #[default]
    Files,

    /// A pretty-printed JSON array of page records
    Json,

    /// All pages in one markdown document
    Single,
}

impl OutputFormat {
    /// The writer for this format
    pub fn writer(self) -> Box<dyn OutputWriter> {
        match self {
            Self::Files => Box::new(FilesWriter),
            Self::Json => Box::new(JsonWriter),
            Self::Single => Box::new(SingleFileWriter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Files => "files",
            Self::Json => "json",
            Self::Single => "single",
        };
        f.write_str(name)
    }
}

/// Writes the pages of a crawl in the requested format
///
/// # Arguments
///
/// * `pages` - The kept pages, in crawl order
/// * `seed` - The URL the crawl started from
/// * `format` - Output format
/// * `directory` - Destination directory (created if missing)
///
/// # Returns
///
/// * `Ok(WriteReport)` - What was written and where
/// * `Err(OutputError)` - The directory or file could not be written
pub fn write_output(
    pages: &[PageRecord],
    seed: &str,
    format: OutputFormat,
    directory: &Path,
) -> OutputResult<WriteReport> {
    tracing::debug!(
        "Writing {} pages as {} to {}",
        pages.len(),
        format,
        directory.display()
    );
    format.writer().write(pages, seed, directory)
}
