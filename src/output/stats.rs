//! Crawl statistics
//!
//! This module summarizes a finished crawl: page counts, duplicates and
//! timing. The same summary is printed by the CLI and returned by the API.

use crate::state::CrawlResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStatistics {
    /// Number of kept page records
    pub total_pages: usize,

    /// Pages converted successfully
    pub success_pages: usize,

    /// Pages recorded with an error
    pub error_pages: usize,

    /// Discovered links that pointed at already claimed URLs
    pub duplicates: u64,

    /// True when the crawl stopped early
    pub cancelled: bool,

    /// Wall time of the crawl, e.g. `1.503s`
    pub processing_time: String,

    pub started_at: DateTime<Utc>,

    pub completed_at: DateTime<Utc>,
}

impl CrawlStatistics {
    /// Summarizes a crawl result
    pub fn from_result(
        result: &CrawlResult,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            total_pages: result.len(),
            success_pages: result.success_count(),
            error_pages: result.error_count(),
            duplicates: result.duplicates,
            cancelled: result.cancelled,
            ..Self::timing(started_at, completed_at)
        }
    }

    /// Statistics carrying only timing, for crawls that produced no result
    pub fn timing(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        let elapsed = (completed_at - started_at).to_std().unwrap_or_default();

        Self {
            total_pages: 0,
            success_pages: 0,
            error_pages: 0,
            duplicates: 0,
            cancelled: false,
            processing_time: format!("{:?}", elapsed),
            started_at,
            completed_at,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("  Total pages: {}", stats.total_pages);
    println!("  Successful: {}", stats.success_pages);
    println!("  Errors: {}", stats.error_pages);
    println!("  Duplicate links skipped: {}", stats.duplicates);
    println!("  Processing time: {}", stats.processing_time);

    if stats.cancelled {
        println!("\nCrawl was cancelled; results are partial.");
    }
}
