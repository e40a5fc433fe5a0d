//! Background refresh loop.
//!
//! One long-lived task keeps the catalog cache warm: when the cache is stale
//! (or empty) it walks the feed's item range page by page, merging and
//! persisting after every page so partial progress survives a crash. Page
//! N is persisted before page N+1 is requested; nothing here runs in
//! parallel. A failing page is logged and skipped, never fatal to the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogCache, PersistOutcome};
use crate::config::FeedConfig;
use crate::feed::FeedSource;
use crate::metrics;

/// The result of one wake-up of the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cache was still fresh; nothing was fetched.
    Fresh,
    /// A full pass over the item range was made.
    Completed {
        pages_fetched: u32,
        pages_failed: u32,
        entries_added: usize,
    },
}

/// Drives the fetch/merge/persist cycle on a fixed interval.
pub struct Refresher {
    cache: Arc<CatalogCache>,
    feed: Arc<dyn FeedSource>,
    interval: Duration,
    total_items: u32,
    page_size: u32,
}

impl Refresher {
    pub fn new(cache: Arc<CatalogCache>, feed: Arc<dyn FeedSource>, config: &FeedConfig) -> Self {
        Self {
            cache,
            feed,
            interval: Duration::from_millis(config.refresh_interval_ms),
            total_items: config.total_items,
            page_size: config.page_size,
        }
    }

    /// Run until a shutdown signal arrives.
    ///
    /// The signal only terminates this task; readers keep being served from
    /// the cache for as long as the process lives.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            total_items = self.total_items,
            page_size = self.page_size,
            "refresher started"
        );

        loop {
            match self.run_cycle().await {
                CycleOutcome::Fresh => {
                    debug!("catalog is fresh, skipping refresh");
                }
                CycleOutcome::Completed {
                    pages_fetched,
                    pages_failed,
                    entries_added,
                } => {
                    info!(pages_fetched, pages_failed, entries_added, "refresh cycle finished");
                }
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("refresher received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("refresher stopped");
    }

    /// One wake-up: check staleness, and if due, sweep the whole item range.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if !self.cache.is_stale(self.interval) {
            metrics::REFRESH_CYCLES.with_label_values(&["fresh"]).inc();
            return CycleOutcome::Fresh;
        }

        info!("catalog is stale, refreshing");
        let started = Instant::now();

        let mut pages_fetched = 0u32;
        let mut pages_failed = 0u32;
        let mut entries_added = 0usize;

        let mut from = 1u32;
        while from < self.total_items {
            let to = from + self.page_size - 1;

            match self.feed.fetch_page(from, to).await {
                Ok(entries) => {
                    let added = self.cache.merge(entries);
                    entries_added += added;
                    pages_fetched += 1;
                    metrics::FEED_PAGES.with_label_values(&["ok"]).inc();
                    metrics::ENTRIES_ADDED.inc_by(added as u64);
                    debug!(from, to, added, "feed page merged");
                }
                Err(e) => {
                    pages_failed += 1;
                    metrics::FEED_PAGES.with_label_values(&["error"]).inc();
                    warn!(from, to, error = %e, "feed page fetch failed, skipping");
                }
            }

            // Persist after every page, not just at the end, so a mid-cycle
            // crash keeps whatever was already fetched.
            match self.cache.persist() {
                Ok(PersistOutcome::Written { entries, folded }) => {
                    metrics::SNAPSHOT_WRITES.with_label_values(&["written"]).inc();
                    debug!(entries, folded, "snapshot written");
                }
                Ok(PersistOutcome::SkippedEmpty) => {
                    metrics::SNAPSHOT_WRITES.with_label_values(&["skipped"]).inc();
                    debug!("nothing to persist yet");
                }
                Err(e) => {
                    metrics::SNAPSHOT_WRITES.with_label_values(&["error"]).inc();
                    warn!(error = %e, "snapshot write failed, keeping in-memory state");
                }
            }

            from += self.page_size;
        }

        metrics::REFRESH_CYCLES.with_label_values(&["completed"]).inc();
        metrics::REFRESH_DURATION.observe(started.elapsed().as_secs_f64());

        CycleOutcome::Completed {
            pages_fetched,
            pages_failed,
            entries_added,
        }
    }
}
