//! Mock feed source for testing.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::catalog::Entry;
use crate::feed::{FeedError, FeedSource};

/// Mock implementation of the [`FeedSource`] trait.
///
/// Pages are keyed by their `from` index. Unconfigured pages behave like the
/// real feed past its last item: `FeedError::NoEntries`. Calls are recorded
/// for assertions.
#[derive(Default)]
pub struct MockFeedSource {
    pages: RwLock<HashMap<u32, Vec<Entry>>>,
    failing: RwLock<HashSet<u32>>,
    calls: RwLock<Vec<(u32, u32)>>,
}

impl std::fmt::Debug for MockFeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFeedSource")
            .field("pages", &"<pages>")
            .field("failing", &"<failing>")
            .field("calls", &"<calls>")
            .finish()
    }
}

impl MockFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `entries` for the page starting at `from`.
    pub fn set_page(&self, from: u32, entries: Vec<Entry>) {
        self.pages.write().unwrap().insert(from, entries);
    }

    /// Make the page starting at `from` fail with an HTTP 500.
    pub fn fail_page(&self, from: u32) {
        self.failing.write().unwrap().insert(from);
    }

    /// Every `(from, to)` window requested so far, in order.
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch_page(&self, from: u32, to: u32) -> Result<Vec<Entry>, FeedError> {
        self.calls.write().unwrap().push((from, to));

        if self.failing.read().unwrap().contains(&from) {
            return Err(FeedError::Status(500));
        }

        match self.pages.read().unwrap().get(&from) {
            Some(entries) if !entries.is_empty() => Ok(entries.clone()),
            _ => Err(FeedError::NoEntries),
        }
    }
}
