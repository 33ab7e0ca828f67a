//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first level loop that coordinates all
//! aspects of a crawl, including:
//! - Validating the seed and claiming it before the first level
//! - Fanning out one worker task per frontier URL and joining the level
//! - Collecting kept page records in level order
//! - Deriving the next frontier through the shared dedup store
//! - Stopping between levels when cancelled

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::crawler::converter::{HtmdConverter, HtmlConverter};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::parser::{ExtractedLinks, LinkExtractor};
use crate::crawler::throttle::Throttle;
use crate::crawler::worker::{PageOutcome, Worker};
use crate::state::{CrawlResult, DedupStore};
use crate::url::{extract_host, normalize_url, parse_seed};
use crate::{CrawlError, UrlError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    client: Client,
    converter: Arc<dyn HtmlConverter>,
    throttle: Throttle,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration, fixed for the lifetime of the crawl
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client failure
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        validate_crawl_config(&config)?;

        let client = build_http_client(&config)?;
        let throttle = Throttle::new(&config);

        Ok(Self {
            config: Arc::new(config),
            client,
            converter: Arc::new(HtmdConverter::new()),
            throttle,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the HTML-to-markdown converter
    pub fn with_converter(mut self, converter: Arc<dyn HtmlConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Uses an externally owned cancellation token
    ///
    /// Cancelling the token stops the crawl before the next level starts.
    /// Fetches already in flight are allowed to finish.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this coordinator's crawls
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the breadth-first crawl loop
    ///
    /// # Level Processing
    ///
    /// For every level while `depth <= max_depth` and the frontier is non-empty:
    /// 1. Spawn one worker per frontier URL and wait for all of them
    /// 2. Append the level's kept page records to the result
    /// 3. Claim every discovered link; newly claimed links form the next frontier
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Kept pages grouped by non-decreasing depth
    /// * `Err(CrawlError::InvalidUrl)` - The seed is not an absolute http(s) URL
    pub async fn run(&self, seed: &str) -> Result<CrawlResult, CrawlError> {
        let seed_url = parse_seed(seed)?;
        let base_host =
            extract_host(&seed_url).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        let dedup = DedupStore::new();
        let start = normalize_url(seed_url.as_str());
        dedup.try_claim(&start);

        let worker = Arc::new(Worker::new(
            self.client.clone(),
            Arc::clone(&self.converter),
            LinkExtractor::new(base_host, self.config.follow_external_links),
            self.throttle.clone(),
            self.config.max_depth,
        ));

        tracing::info!(
            "Starting crawl of {} (max depth {})",
            start,
            self.config.max_depth
        );

        let started = Instant::now();
        let mut result = CrawlResult::default();
        let mut frontier = vec![start];
        let mut depth = 0;

        while depth <= self.config.max_depth && !frontier.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled before depth {}", depth);
                result.cancelled = true;
                break;
            }

            tracing::info!("Processing depth {}: {} URLs", depth, frontier.len());

            let outcomes = self.process_level(&worker, frontier, depth).await;

            let mut discovered = Vec::new();
            for outcome in outcomes {
                match outcome {
                    PageOutcome::Converted { page, links } => {
                        result.pages.push(page);
                        discovered.push(links);
                    }
                    PageOutcome::Failed(page) => result.pages.push(page),
                    PageOutcome::Minimal { .. } => {}
                }
            }

            frontier = next_frontier(&dedup, discovered);
            depth += 1;
        }

        result.duplicates = dedup.duplicate_count();

        tracing::info!(
            "Crawl completed: {} pages kept ({} errors), {} duplicates skipped in {:?}",
            result.len(),
            result.error_count(),
            result.duplicates,
            started.elapsed()
        );

        Ok(result)
    }

    /// Fans out one task per URL and waits for the whole level
    async fn process_level(
        &self,
        worker: &Arc<Worker>,
        frontier: Vec<String>,
        depth: u32,
    ) -> Vec<PageOutcome> {
        let mut tasks = JoinSet::new();

        for url in frontier {
            let worker = Arc::clone(worker);
            tasks.spawn(async move { worker.fetch_and_convert(&url, depth).await });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("Worker task failed at depth {}: {}", depth, e),
            }
        }

        outcomes
    }
}

/// Claims every link discovered on a level
///
/// Links that win their claim form the next frontier. Repeats within a page
/// are claimed after all first occurrences, so they only count as duplicates.
fn next_frontier(dedup: &DedupStore, discovered: Vec<ExtractedLinks>) -> Vec<String> {
    let mut frontier = Vec::new();
    let mut repeats = Vec::new();

    for extracted in discovered {
        for link in extracted.links {
            if dedup.try_claim(&link) {
                frontier.push(link);
            }
        }
        repeats.extend(extracted.repeats);
    }

    for link in repeats {
        dedup.try_claim(&link);
    }

    frontier
}

/// Crawls a website starting from `seed`
///
/// Convenience wrapper that builds a [`Coordinator`] with the default
/// converter and runs a single crawl.
///
/// # Example
///
/// ```no_run
/// use website_markdown::{scrape_website, CrawlConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = scrape_website("https://example.com", CrawlConfig::default()).await?;
/// for page in &result.pages {
///     println!("{} (depth {})", page.title, page.depth);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scrape_website(seed: &str, config: CrawlConfig) -> Result<CrawlResult, CrawlError> {
    Coordinator::new(config)?.run(seed).await
}
