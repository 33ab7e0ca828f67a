use dashmap::DashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Crawl-wide record of claimed URLs
///
/// This is the only state shared between concurrent workers. Callers can
/// only claim a URL or read the duplicate counter; a claimed URL is never
/// released for the lifetime of the crawl.
#[derive(Debug, Default)]
pub struct DedupStore {
    claimed: DashSet<String>,
    duplicates: AtomicU64,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a normalized URL for fetching
    ///
    /// Returns true if the URL was unseen and is now claimed by the caller.
    /// Returns false and counts a duplicate if it was already claimed. Two
    /// callers presenting the same URL at the same time never both get true.
    pub fn try_claim(&self, normalized_url: &str) -> bool {
        if self.claimed.insert(normalized_url.to_string()) {
            true
        } else {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Number of claims rejected because the URL was already claimed
    pub fn duplicate_count(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }
}
