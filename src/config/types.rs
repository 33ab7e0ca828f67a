use crate::output::OutputFormat;
use serde::Deserialize;
use std::time::Duration;

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default pause between requests
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Website-Markdown-Converter/1.0";

/// Default number of simultaneous fetches
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default API server port
pub const DEFAULT_PORT: u16 = 8080;

/// Top-level configuration file structure
///
/// Every section is optional; missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

/// Parameters for a single crawl
///
/// Immutable once handed to a [`crate::Coordinator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Inclusive bound on the number of link hops followed from the seed
    pub max_depth: u32,

    /// Timeout applied to every HTTP request
    #[serde(rename = "request-timeout-ms", with = "duration_ms")]
    pub request_timeout: Duration,

    /// Minimum spacing between requests across the whole worker pool
    #[serde(rename = "delay-ms", with = "duration_ms")]
    pub inter_request_delay: Duration,

    /// Whether links to other hosts are followed
    #[serde(rename = "follow-external")]
    pub follow_external_links: bool,

    pub user_agent: String,

    /// Cap on simultaneous in-flight fetches for the whole crawl
    pub max_concurrency: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            inter_request_delay: DEFAULT_DELAY,
            follow_external_links: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: Some(DEFAULT_CONCURRENCY),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// How crawl results are written
    pub format: OutputFormat,

    /// Directory that receives the output files
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Files,
            directory: ".".to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Serde adapter for durations written as integer milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
