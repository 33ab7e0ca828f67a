//! Output writer traits and types
//!
//! This module defines the trait interface for output writers and the
//! report they return after writing a crawl result.

use crate::state::PageRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a writer produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// The file written, or the directory for per-page output
    pub path: PathBuf,

    /// Number of pages written
    pub written: usize,

    /// Number of pages left out (error records and failed writes)
    pub skipped: usize,
}

/// Trait for output writers
///
/// A writer turns the kept pages of a crawl into files below `directory`.
/// Implementations create the directory when it does not exist.
pub trait OutputWriter {
    /// Writes the pages of a crawl rooted at `seed`
    ///
    /// # Arguments
    ///
    /// * `pages` - The kept pages, in crawl order
    /// * `seed` - The URL the crawl started from
    /// * `directory` - Where the output goes
    fn write(&self, pages: &[PageRecord], seed: &str, directory: &Path)
        -> OutputResult<WriteReport>;
}
