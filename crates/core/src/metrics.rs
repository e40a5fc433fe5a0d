//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Refresher (cycles, duration)
//! - Feed fetching (pages, entries)
//! - Snapshot persistence (writes)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

/// Refresh cycles by outcome.
pub static REFRESH_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_refresh_cycles_total", "Total refresh cycles"),
        &["outcome"], // "fresh", "completed"
    )
    .unwrap()
});

/// Duration of a completed refresh cycle in seconds.
pub static REFRESH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "marquee_refresh_duration_seconds",
            "Duration of completed refresh cycles",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

/// Feed pages fetched by result.
pub static FEED_PAGES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_feed_pages_total", "Total feed pages fetched"),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

/// New entries merged into the active cache.
pub static ENTRIES_ADDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_entries_added_total",
        "Total entries added to the active cache",
    )
    .unwrap()
});

/// Snapshot writes by result.
pub static SNAPSHOT_WRITES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_snapshot_writes_total", "Total snapshot writes"),
        &["result"], // "written", "skipped", "error"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REFRESH_CYCLES.clone()),
        Box::new(REFRESH_DURATION.clone()),
        Box::new(FEED_PAGES.clone()),
        Box::new(ENTRIES_ADDED.clone()),
        Box::new(SNAPSHOT_WRITES.clone()),
    ]
}
