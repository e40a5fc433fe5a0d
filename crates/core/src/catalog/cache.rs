//! In-memory catalog cache backed by the on-disk snapshot.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::snapshot::{SnapshotDocument, SnapshotError, SnapshotStore};

use super::normalize;
use super::types::{Entry, RangeError};

/// What a [`CatalogCache::persist`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The active set is empty; the durable state was left untouched.
    SkippedEmpty,
    /// A snapshot was written.
    Written {
        /// Entries in the written snapshot.
        entries: usize,
        /// Active entries newly folded into the fallback set.
        folded: usize,
    },
}

/// The in-memory catalog.
///
/// Holds the `active` set (what readers are served from) and the `fallback`
/// set (the last known persisted-good state). Both are insertion-ordered and
/// unique by entry id; an id index keeps de-duplication and lookup O(1).
///
/// Constructed once at startup and shared via `Arc` with the refresher and
/// the read-side handlers. Only the refresher mutates it; writes hold the
/// lock briefly, so readers observe a consistent (if momentarily stale) view.
pub struct CatalogCache {
    store: SnapshotStore,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    active: Vec<Entry>,
    /// Entry id -> position in `active`.
    active_index: HashMap<String, usize>,
    fallback: Vec<Entry>,
    fallback_index: HashMap<String, usize>,
    /// Milliseconds since the epoch of the last successful persist.
    last_updated: i64,
}

impl CatalogCache {
    /// Build the cache from the snapshot on disk.
    ///
    /// The fallback set is seeded with every snapshot record that survives
    /// normalization and the active set starts as a copy of it. A corrupt
    /// snapshot is an error; startup must not proceed past one.
    pub fn from_snapshot(store: SnapshotStore) -> Result<Self, SnapshotError> {
        let document = store.load()?;

        let mut inner = Inner {
            last_updated: document.last_updated,
            ..Inner::default()
        };

        let mut rejected = 0usize;
        for raw in &document.entries {
            let Some(entry) = normalize::snapshot_record(raw) else {
                rejected += 1;
                continue;
            };
            if inner.fallback_index.contains_key(&entry.id) {
                continue;
            }
            inner
                .fallback_index
                .insert(entry.id.clone(), inner.fallback.len());
            inner.fallback.push(entry);
        }
        if rejected > 0 {
            debug!(rejected, "dropped snapshot records failing normalization");
        }

        inner.active = inner.fallback.clone();
        inner.active_index = inner.fallback_index.clone();

        info!(
            entries = inner.active.len(),
            last_updated = inner.last_updated,
            "catalog cache loaded from snapshot"
        );

        Ok(Self {
            store,
            inner: RwLock::new(inner),
        })
    }

    /// Append entries whose id is not yet in the active set.
    ///
    /// Returns how many were actually added. The active set only ever grows;
    /// existing entries are never overwritten or removed.
    pub fn merge(&self, entries: Vec<Entry>) -> usize {
        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;
        let mut added = 0usize;
        for entry in entries {
            if inner.active_index.contains_key(&entry.id) {
                continue;
            }
            inner
                .active_index
                .insert(entry.id.clone(), inner.active.len());
            inner.active.push(entry);
            added += 1;
        }
        added
    }

    /// Look up an entry by id in the active set.
    pub fn entry_by_id(&self, id: &str) -> Option<Entry> {
        let inner = self.inner.read().unwrap();
        inner
            .active_index
            .get(id)
            .map(|&position| inner.active[position].clone())
    }

    /// A filtered slice of the active set, in insertion order.
    ///
    /// `from..to` index into the active set; `to` is clamped to its length,
    /// and a `from` past the clamped end yields an empty result. `genre` and
    /// `kind` are filters; the literal "all" (any casing) disables one.
    /// Genre membership is an exact match, program type is case-insensitive.
    pub fn range(
        &self,
        from: i64,
        to: i64,
        genre: &str,
        kind: &str,
    ) -> Result<Vec<Entry>, RangeError> {
        if from < 0 || to < 0 {
            return Err(RangeError::NegativeBound { from, to });
        }
        if from > to {
            return Err(RangeError::Inverted { from, to });
        }

        let inner = self.inner.read().unwrap();
        let from = from as usize;
        let to = (to as usize).min(inner.active.len());
        let window = inner.active.get(from..to).unwrap_or(&[]);

        let any_genre = genre.eq_ignore_ascii_case("all");
        let any_kind = kind.eq_ignore_ascii_case("all");

        Ok(window
            .iter()
            .filter(|entry| any_genre || entry.genres.iter().any(|g| g == genre))
            .filter(|entry| any_kind || entry.program_type.eq_ignore_ascii_case(kind))
            .cloned()
            .collect())
    }

    /// Write the active set to the snapshot, then fold newly persisted
    /// entries into the fallback set.
    ///
    /// A no-op when the active set is empty: durable state is never
    /// overwritten with nothing. On a write error the in-memory state is left
    /// as-is (including `last_updated`), so the next cycle retries.
    pub fn persist(&self) -> Result<PersistOutcome, SnapshotError> {
        let now = Utc::now().timestamp_millis();

        let document = {
            let inner = self.inner.read().unwrap();
            if inner.active.is_empty() {
                return Ok(PersistOutcome::SkippedEmpty);
            }
            let entries = inner
                .active
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()
                .map_err(SnapshotError::Encode)?;
            SnapshotDocument {
                last_updated: now,
                entries,
            }
        };

        self.store.write(&document)?;

        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;
        inner.last_updated = now;

        let mut folded = 0usize;
        for entry in &inner.active {
            if inner.fallback_index.contains_key(&entry.id) {
                continue;
            }
            inner
                .fallback_index
                .insert(entry.id.clone(), inner.fallback.len());
            inner.fallback.push(entry.clone());
            folded += 1;
        }

        Ok(PersistOutcome::Written {
            entries: document.entries.len(),
            folded,
        })
    }

    /// Whether a refresh is due: the cache is empty, or the last persist is
    /// older than `interval`.
    pub fn is_stale(&self, interval: Duration) -> bool {
        let inner = self.inner.read().unwrap();
        if inner.active.is_empty() {
            return true;
        }
        let age = Utc::now().timestamp_millis() - inner.last_updated;
        age > interval.as_millis() as i64
    }

    /// Milliseconds since the epoch of the last successful persist.
    pub fn last_updated(&self) -> i64 {
        self.inner.read().unwrap().last_updated
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().active.is_empty()
    }

    /// Number of entries in the active set.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().active.len()
    }

    /// Number of entries in the fallback set.
    pub fn fallback_len(&self) -> usize {
        self.inner.read().unwrap().fallback.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    fn empty_cache(dir: &TempDir) -> CatalogCache {
        let store = SnapshotStore::open(dir.path().join("snapshot.json")).unwrap();
        CatalogCache::from_snapshot(store).unwrap()
    }

    #[test]
    fn test_merge_deduplicates_by_id() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);

        let added = cache.merge(vec![
            fixtures::entry("a", "Drama", "movie"),
            fixtures::entry("b", "Comedy", "series"),
        ]);
        assert_eq!(added, 2);
        assert_eq!(cache.len(), 2);

        // A page containing an already-known id adds nothing.
        let added = cache.merge(vec![fixtures::entry("a", "Horror", "movie")]);
        assert_eq!(added, 0);
        assert_eq!(cache.len(), 2);

        // The original entry wins; merges never overwrite.
        assert_eq!(cache.entry_by_id("a").unwrap().genres, vec!["Drama"]);
    }

    #[test]
    fn test_entry_by_id() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);
        cache.merge(vec![fixtures::entry("a", "Drama", "movie")]);

        assert_eq!(cache.entry_by_id("a").unwrap().id, "a");
        assert!(cache.entry_by_id("missing").is_none());
    }

    #[test]
    fn test_range_invalid_bounds() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);

        assert_eq!(
            cache.range(-1, 5, "all", "all"),
            Err(RangeError::NegativeBound { from: -1, to: 5 })
        );
        assert_eq!(
            cache.range(0, -5, "all", "all"),
            Err(RangeError::NegativeBound { from: 0, to: -5 })
        );
        assert_eq!(
            cache.range(7, 3, "all", "all"),
            Err(RangeError::Inverted { from: 7, to: 3 })
        );
    }

    #[test]
    fn test_range_clamps_and_preserves_order() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);
        cache.merge(vec![
            fixtures::entry("a", "Drama", "movie"),
            fixtures::entry("b", "Comedy", "series"),
            fixtures::entry("c", "Drama", "series"),
        ]);

        let all = cache.range(0, 100, "all", "all").unwrap();
        assert_eq!(
            all.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );

        let tail = cache.range(1, 100, "all", "all").unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].id, "b");

        // Start past the clamped end is empty, not an error.
        assert!(cache.range(50, 100, "all", "all").unwrap().is_empty());
    }

    #[test]
    fn test_range_filters() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);
        cache.merge(vec![
            fixtures::entry("a", "Drama", "movie"),
            fixtures::entry("b", "Comedy", "series"),
            fixtures::entry("c", "Drama", "series"),
        ]);

        // Genre only.
        let drama = cache.range(0, 10, "Drama", "all").unwrap();
        assert_eq!(
            drama.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        // Genre membership is exact, not case-insensitive.
        assert!(cache.range(0, 10, "drama", "all").unwrap().is_empty());

        // Type only, case-insensitive.
        let series = cache.range(0, 10, "all", "SERIES").unwrap();
        assert_eq!(series.len(), 2);

        // Both filters AND together.
        let both = cache.range(0, 10, "Drama", "series").unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "c");
    }

    #[test]
    fn test_persist_skips_empty_active_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        let store = SnapshotStore::open(&path).unwrap();
        let cache = CatalogCache::from_snapshot(store).unwrap();

        assert_eq!(cache.persist().unwrap(), PersistOutcome::SkippedEmpty);
        assert_eq!(cache.last_updated(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let cache = CatalogCache::from_snapshot(SnapshotStore::open(&path).unwrap()).unwrap();
        cache.merge(vec![
            fixtures::entry("a", "Drama", "movie"),
            fixtures::entry("b", "Comedy", "series"),
        ]);

        let outcome = cache.persist().unwrap();
        assert_eq!(
            outcome,
            PersistOutcome::Written {
                entries: 2,
                folded: 2
            }
        );
        assert!(cache.last_updated() > 0);

        // A fresh cache rebuilt from the written snapshot is equal.
        let reloaded = CatalogCache::from_snapshot(SnapshotStore::open(&path).unwrap()).unwrap();
        assert_eq!(reloaded.last_updated(), cache.last_updated());
        assert_eq!(
            reloaded.range(0, 10, "all", "all").unwrap(),
            cache.range(0, 10, "all", "all").unwrap()
        );
    }

    #[test]
    fn test_persist_folds_only_new_entries_into_fallback() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);

        cache.merge(vec![fixtures::entry("a", "Drama", "movie")]);
        assert_eq!(
            cache.persist().unwrap(),
            PersistOutcome::Written {
                entries: 1,
                folded: 1
            }
        );
        assert_eq!(cache.fallback_len(), 1);

        cache.merge(vec![fixtures::entry("b", "Comedy", "series")]);
        assert_eq!(
            cache.persist().unwrap(),
            PersistOutcome::Written {
                entries: 2,
                folded: 1
            }
        );
        assert_eq!(cache.fallback_len(), 2);
    }

    #[test]
    fn test_snapshot_seeds_fallback_and_active() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let seeded = CatalogCache::from_snapshot(SnapshotStore::open(&path).unwrap()).unwrap();
        seeded.merge(vec![fixtures::entry("a", "Drama", "movie")]);
        seeded.persist().unwrap();

        let cache = CatalogCache::from_snapshot(SnapshotStore::open(&path).unwrap()).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fallback_len(), 1);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_is_stale() {
        let dir = TempDir::new().unwrap();
        let cache = empty_cache(&dir);

        // Empty cache is always due for a refresh.
        assert!(cache.is_stale(Duration::from_millis(900_000)));

        cache.merge(vec![fixtures::entry("a", "Drama", "movie")]);
        cache.persist().unwrap();

        // Freshly persisted and non-empty: not due.
        assert!(!cache.is_stale(Duration::from_millis(900_000)));
    }

    #[test]
    fn test_is_stale_when_last_update_is_old() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let entry = serde_json::to_value(fixtures::entry("a", "Drama", "movie")).unwrap();
        let old = chrono::Utc::now().timestamp_millis() - 1_000_000;
        std::fs::write(
            &path,
            serde_json::json!({ "lastUpdated": old, "entries": [entry] }).to_string(),
        )
        .unwrap();

        let cache = CatalogCache::from_snapshot(SnapshotStore::open(&path).unwrap()).unwrap();
        assert!(!cache.is_empty());
        assert!(cache.is_stale(Duration::from_millis(900_000)));
    }
}
