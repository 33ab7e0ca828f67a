//! State module for a single crawl
//!
//! # Components
//!
//! - `DedupStore`: the claimed-URL set shared by every worker of a crawl
//! - `PageRecord` / `PageError`: what a worker reports for one page
//! - `CrawlResult`: the kept pages of a whole crawl

mod dedup;
mod page;

// Re-export main types
pub use dedup::DedupStore;
pub use page::{CrawlResult, PageError, PageRecord};
