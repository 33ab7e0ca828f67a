//! HTTP API for running crawls on request
//!
//! Routes:
//! - `GET /health` - liveness check
//! - `GET /api/v1/status` - service description
//! - `POST /api/v1/scrape` - crawl a site and return its pages
//!
//! CORS is open to the local frontend dev and preview servers.

mod handlers;

pub use handlers::{ScrapeRequest, ScrapeResponse};

use crate::config::CrawlConfig;
use crate::CrawlError;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// User agent sent by crawls started through the API
pub const API_USER_AGENT: &str = "Website-Markdown-API/1.0";

/// Frontend origins allowed to call the API
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:4173"];

/// Shared application state injected into every route handler
#[derive(Clone)]
pub struct AppState {
    /// Settings every API crawl starts from; requests override depth,
    /// delay and external-link following
    pub base_config: Arc<CrawlConfig>,
}

impl AppState {
    pub fn new(base_config: CrawlConfig) -> Self {
        Self {
            base_config: Arc::new(base_config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CrawlConfig {
            user_agent: API_USER_AGENT.to_string(),
            ..CrawlConfig::default()
        })
    }
}

/// Builds the API router
pub fn create_router(state: AppState) -> Router {
    let origins = ALLOWED_ORIGINS.map(HeaderValue::from_static);

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION]);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/v1/status", get(handlers::status_handler))
        .route("/api/v1/scrape", post(handlers::scrape_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `port` until Ctrl-C
pub async fn start_server(port: u16, state: AppState) -> Result<(), CrawlError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);
    tracing::info!("  POST /api/v1/scrape - Scrape a website");
    tracing::info!("  GET  /api/v1/status - Get server status");
    tracing::info!("  GET  /health - Health check");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CrawlError::Server(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(AppState::default())
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn scrape_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/scrape")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "website-markdown-converter");
        assert!(body["time"].is_string());
    }

    #[tokio::test]
    async fn test_status() {
        let request = Request::builder()
            .uri("/api/v1/status")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_malformed_body() {
        let (status, body) = send(scrape_request("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_scrape_missing_url() {
        let (status, body) = send(scrape_request(r#"{"url":"  "}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_scrape_invalid_url() {
        let (status, body) = send(scrape_request(r#"{"url":"not a url"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["stats"]["processingTime"].is_string());
    }

    #[tokio::test]
    async fn test_scrape_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(
                        "<html><head><title>Fixture</title></head><body>\
                         <p>This fixture page has a first paragraph of ordinary prose text.</p>\
                         <p>It continues with a second paragraph that says a little more.</p>\
                         <p>And it closes with a third paragraph so the page is kept.</p>\
                         </body></html>",
                        "text/html",
                    ),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = format!(r#"{{"url":"{}/","maxDepth":1}}"#, server.uri());
        let (status, body) = send(scrape_request(&body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["pages"].as_array().unwrap().len(), 1);
        assert_eq!(body["pages"][0]["title"], "Fixture");
        assert_eq!(body["stats"]["totalPages"], 1);
        assert_eq!(body["stats"]["successPages"], 1);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/scrape")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = create_router(AppState::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:5173"
        );
    }
}
