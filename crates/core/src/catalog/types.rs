//! Types for the media catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used when a text field is absent from the feed.
pub const MISSING_TEXT: &str = "N/A";

/// Placeholder used when the release year is absent from the feed.
pub const MISSING_YEAR: i32 = -1;

/// Image URL -> (width, height). Tuples serialize as two-element arrays,
/// which is the on-disk shape for covers and backdrops.
pub type ArtworkMap = BTreeMap<String, (u32, u32)>;

/// A single catalog entry, normalized from either the raw feed schema or the
/// persisted snapshot schema. Identity is the `id` field.
///
/// The serde representation of this struct IS the persisted snapshot schema,
/// so writing a snapshot is plain serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Stable external identifier ("N/A" if the feed omitted it).
    pub id: String,
    pub title: String,
    pub description: String,
    /// Program kind, e.g. "movie" or "series".
    pub program_type: String,
    /// Release year, -1 if absent.
    pub release_year: i32,
    /// Poster-style artwork.
    pub covers: ArtworkMap,
    /// Backdrop-style artwork.
    pub backdrops: ArtworkMap,
    /// Genre tags in source order.
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    /// Playable trailer URLs in source order.
    pub trailers: Vec<String>,
}

/// Invalid bounds passed to a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range bounds must not be negative (got {from}..{to})")]
    NegativeBound { from: i64, to: i64 },

    #[error("range start {from} is past its end {to}")]
    Inverted { from: i64, to: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_entry_serializes_with_snapshot_field_names() {
        let entry = fixtures::entry("abc123", "Drama", "movie");

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], "abc123");
        assert!(json.get("programType").is_some());
        assert!(json.get("releaseYear").is_some());
        assert!(json.get("program_type").is_none());
    }

    #[test]
    fn test_artwork_serializes_as_url_to_pair() {
        let entry = fixtures::entry("abc123", "Drama", "movie");

        let json = serde_json::to_value(&entry).unwrap();
        let covers = json["covers"].as_object().unwrap();
        let (_, dims) = covers.iter().next().unwrap();

        assert_eq!(dims.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = fixtures::entry("abc123", "Drama", "movie");

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, entry);
    }
}
