//! Configuration module for Website-Markdown
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use website_markdown::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("website-markdown.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, OutputConfig, ServerConfig, DEFAULT_CONCURRENCY, DEFAULT_DELAY,
    DEFAULT_MAX_DEPTH, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_crawl_config};
