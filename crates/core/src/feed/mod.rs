//! Remote feed access.
//!
//! The feed is paginated and serves gzip-compressed JSON pages. This module
//! provides a `FeedSource` trait so the refresher can be driven against a
//! test double, plus the reqwest-backed implementation.

mod http;

pub use http::HttpFeedSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Entry;

/// Errors while fetching a feed page. The refresher treats all of these as
/// soft: log, skip the page, keep going.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("failed to decompress feed page: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to parse feed page: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("feed page contained no entries")]
    NoEntries,
}

/// A source of normalized catalog entries, one page at a time.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the item window `[from, to]` and return every record that
    /// survives normalization, in feed order.
    async fn fetch_page(&self, from: u32, to: u32) -> Result<Vec<Entry>, FeedError>;
}
