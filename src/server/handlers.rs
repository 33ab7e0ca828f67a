//! Route handlers for the HTTP API

use crate::config::CrawlConfig;
use crate::crawler::scrape_website;
use crate::output::CrawlStatistics;
use crate::server::AppState;
use crate::state::PageRecord;
use crate::CrawlError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Depth used when a request gives none (or a non-positive one)
pub const DEFAULT_API_DEPTH: i64 = 3;

/// Largest depth a request may ask for
pub const MAX_API_DEPTH: i64 = 10;

/// Delay in milliseconds used when a request gives none
pub const DEFAULT_API_DELAY_MS: i64 = 1000;

/// Smallest delay in milliseconds a request may ask for
pub const MIN_API_DELAY_MS: i64 = 500;

/// Body of `POST /api/v1/scrape`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,

    #[serde(default)]
    pub max_depth: i64,

    /// Milliseconds between requests
    #[serde(default)]
    pub delay: i64,

    #[serde(default)]
    pub follow_external: bool,
}

impl ScrapeRequest {
    /// Depth after applying the API limits
    pub fn effective_depth(&self) -> u32 {
        let depth = if self.max_depth <= 0 {
            DEFAULT_API_DEPTH
        } else {
            self.max_depth.min(MAX_API_DEPTH)
        };
        depth as u32
    }

    /// Delay after applying the API limits
    pub fn effective_delay(&self) -> Duration {
        let delay = if self.delay <= 0 {
            DEFAULT_API_DELAY_MS
        } else {
            self.delay.max(MIN_API_DELAY_MS)
        };
        Duration::from_millis(delay as u64)
    }

    /// Crawl configuration for this request, starting from the server's base
    pub fn crawl_config(&self, base: &CrawlConfig) -> CrawlConfig {
        CrawlConfig {
            max_depth: self.effective_depth(),
            inter_request_delay: self.effective_delay(),
            follow_external_links: self.follow_external,
            ..base.clone()
        }
    }
}

/// Response of `POST /api/v1/scrape`
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CrawlStatistics>,
}

impl ScrapeResponse {
    fn failure(error: impl Into<String>, stats: Option<CrawlStatistics>) -> Self {
        Self {
            success: false,
            message: String::new(),
            pages: None,
            error: Some(error.into()),
            stats,
        }
    }
}

/// `GET /health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "time": Utc::now(),
        "service": "website-markdown-converter",
    }))
}

/// `GET /api/v1/status`
pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/v1/scrape",
            "GET /api/v1/status",
            "GET /health",
        ],
    }))
}

/// `POST /api/v1/scrape`
///
/// Runs a whole crawl inside the request and returns every kept page.
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> (StatusCode, Json<ScrapeResponse>) {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ScrapeResponse::failure(
                    format!("Invalid request: {}", rejection.body_text()),
                    None,
                )),
            );
        }
    };

    if request.url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ScrapeResponse::failure("URL is required", None)),
        );
    }

    let config = request.crawl_config(&state.base_config);

    tracing::info!(
        "API scrape request: {} (depth {}, delay {:?}, external {})",
        request.url,
        config.max_depth,
        config.inter_request_delay,
        config.follow_external_links
    );

    let started_at = Utc::now();
    let outcome = scrape_website(&request.url, config).await;
    let completed_at = Utc::now();

    match outcome {
        Ok(result) => {
            let stats = CrawlStatistics::from_result(&result, started_at, completed_at);

            tracing::info!(
                "Scraping completed: {} pages ({} successful, {} errors) in {}",
                stats.total_pages,
                stats.success_pages,
                stats.error_pages,
                stats.processing_time
            );

            (
                StatusCode::OK,
                Json(ScrapeResponse {
                    success: true,
                    message: format!("Successfully scraped {} pages", stats.success_pages),
                    pages: Some(result.pages),
                    error: None,
                    stats: Some(stats),
                }),
            )
        }
        Err(e) => {
            tracing::warn!("Scraping failed for {}: {}", request.url, e);

            let status = match e {
                CrawlError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let stats = CrawlStatistics::timing(started_at, completed_at);

            (
                status,
                Json(ScrapeResponse::failure(
                    format!("Scraping failed: {}", e),
                    Some(stats),
                )),
            )
        }
    }
}
