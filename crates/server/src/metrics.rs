//! Prometheus metrics for observability.
//!
//! Registers the core refresher/feed/snapshot metrics and adds catalog
//! gauges collected from application state at scrape time.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Entries in the active catalog set.
pub static CATALOG_ACTIVE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "marquee_catalog_active_entries",
        "Number of entries in the active catalog set",
    )
    .unwrap()
});

/// Entries in the fallback catalog set.
pub static CATALOG_FALLBACK_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "marquee_catalog_fallback_entries",
        "Number of entries in the fallback catalog set",
    )
    .unwrap()
});

/// Milliseconds since the epoch of the last successful snapshot write.
pub static CATALOG_LAST_UPDATED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "marquee_catalog_last_updated_ms",
        "Timestamp of the last successful snapshot write (ms since epoch)",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CATALOG_ACTIVE_ENTRIES.clone()))
        .unwrap();
    registry
        .register(Box::new(CATALOG_FALLBACK_ENTRIES.clone()))
        .unwrap();
    registry
        .register(Box::new(CATALOG_LAST_UPDATED.clone()))
        .unwrap();

    // Core metrics (refresher, feed, snapshot)
    for metric in marquee_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Update catalog gauges from current application state.
pub fn collect_dynamic_metrics(state: &AppState) {
    let cache = state.cache();
    CATALOG_ACTIVE_ENTRIES.set(cache.len() as i64);
    CATALOG_FALLBACK_ENTRIES.set(cache.fallback_len() as i64);
    CATALOG_LAST_UPDATED.set(cache.last_updated());
}
