//! Request throttling shared by every worker of a crawl
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore (`max_concurrency`)
//! - Politeness spacing between requests via a token bucket
//!   (`inter_request_delay`)
//!
//! Both limits apply to the whole worker pool, so a wide level fanned out at
//! once still respects them.

use crate::config::CrawlConfig;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Gate every request passes through before it is sent
#[derive(Clone)]
pub struct Throttle {
    /// Cap on in-flight fetches; `None` means unbounded
    permits: Option<Arc<Semaphore>>,

    /// One token per `inter_request_delay`; `None` when the delay is zero
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl Throttle {
    /// Creates a throttle from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Self {
        let permits = config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let limiter = Quota::with_period(config.inter_request_delay)
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Self { permits, limiter }
    }

    /// Creates a throttle that never waits
    pub fn unlimited() -> Self {
        Self {
            permits: None,
            limiter: None,
        }
    }

    /// Waits until a request may be sent
    ///
    /// Acquires a concurrency slot first, then waits for a rate-limit token.
    /// The returned permit (if any) must be held until the request completes.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let permit = match &self.permits {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        permit
    }
}
