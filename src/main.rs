//! Website-Markdown main entry point
//!
//! This is the command-line interface for crawling a website into markdown,
//! and for running the HTTP API.

use anyhow::Context;
use chrono::Utc;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use website_markdown::config::{load_config, validate, Config, DEFAULT_USER_AGENT};
use website_markdown::output::{print_statistics, write_output, CrawlStatistics, OutputFormat};
use website_markdown::server::{start_server, AppState, API_USER_AGENT};
use website_markdown::Coordinator;

/// Website-Markdown: convert a website to markdown
///
/// Crawls a site breadth-first from URL up to a bounded depth, converts every
/// page to markdown and writes the result as files, one document, or JSON.
#[derive(Parser, Debug)]
#[command(name = "website-markdown")]
#[command(version)]
#[command(about = "Convert a website to markdown", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum crawl depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Follow links to other hosts
    #[arg(long)]
    external: bool,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// User agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Maximum number of simultaneous requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the HTTP API instead of a single crawl
    #[arg(long)]
    server: bool,

    /// Port for the HTTP API
    #[arg(long, requires = "server")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.server {
        return handle_server(config).await;
    }

    match cli.url.as_deref() {
        Some(url) => handle_crawl(url, config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("website_markdown=info,warn"),
            1 => EnvFilter::new("website_markdown=debug,tower_http=debug,info"),
            2 => EnvFilter::new("website_markdown=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    let crawler = &mut config.crawler;
    if let Some(depth) = cli.depth {
        crawler.max_depth = depth;
    }
    if let Some(delay) = cli.delay {
        crawler.inter_request_delay = Duration::from_millis(delay);
    }
    if cli.external {
        crawler.follow_external_links = true;
    }
    if let Some(user_agent) = &cli.user_agent {
        crawler.user_agent = user_agent.clone();
    } else if cli.server && crawler.user_agent == DEFAULT_USER_AGENT {
        crawler.user_agent = API_USER_AGENT.to_string();
    }
    if let Some(concurrency) = cli.concurrency {
        crawler.max_concurrency = Some(concurrency);
    }
    if let Some(timeout) = cli.timeout {
        crawler.request_timeout = Duration::from_secs(timeout);
    }

    if let Some(output) = &cli.output {
        config.output.directory = output.display().to_string();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --server mode: serves the HTTP API until Ctrl-C
async fn handle_server(config: Config) -> anyhow::Result<()> {
    let port = config.server.port;
    start_server(port, AppState::new(config.crawler))
        .await
        .with_context(|| format!("API server on port {} failed", port))
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting website to markdown conversion");
    tracing::info!("URL: {}", url);
    tracing::info!("Max depth: {}", config.crawler.max_depth);
    tracing::info!("Delay: {:?}", config.crawler.inter_request_delay);
    tracing::info!("Follow external: {}", config.crawler.follow_external_links);

    let coordinator = Coordinator::new(config.crawler.clone())?;

    // Ctrl-C stops the crawl after the current level
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current level");
            cancel.cancel();
        }
    });

    let started_at = Utc::now();
    let result = coordinator
        .run(url)
        .await
        .with_context(|| format!("crawl of {} failed", url))?;
    let completed_at = Utc::now();

    if result.is_empty() {
        tracing::warn!("No pages were scraped");
        return Ok(());
    }

    let directory = Path::new(&config.output.directory);
    let report = write_output(&result.pages, url, config.output.format, directory)
        .context("failed to write output")?;

    tracing::info!(
        "Wrote {} pages to {} ({} skipped)",
        report.written,
        report.path.display(),
        report.skipped
    );

    print_statistics(&CrawlStatistics::from_result(
        &result,
        started_at,
        completed_at,
    ));

    Ok(())
}
