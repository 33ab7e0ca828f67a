//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a single attempt per page
//! - HTML parsing, link extraction and markdown conversion
//! - The content-quality filter
//! - Request throttling (concurrency cap and inter-request delay)
//! - Breadth-first level coordination

mod converter;
mod coordinator;
mod fetcher;
mod parser;
mod quality;
mod throttle;
mod worker;

pub use converter::{clean_markdown, ConversionError, HtmdConverter, HtmlConverter};
pub use coordinator::{scrape_website, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchedPage};
pub use parser::{extract_title, parse_document, ExtractedLinks, LinkExtractor};
pub use quality::is_minimal;
pub use throttle::Throttle;
pub use worker::{PageOutcome, Worker};
