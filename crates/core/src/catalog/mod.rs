//! The media catalog: entry schema, normalization, and the in-memory cache.
//!
//! The cache is the single source readers are served from. It is loaded from
//! the snapshot at startup and only ever appended to by the refresher; the
//! fallback set keeps the last persisted-good state so a run of bad refresh
//! cycles never shrinks what callers can see.

mod cache;
pub mod normalize;
mod types;

pub use cache::{CatalogCache, PersistOutcome};
pub use types::*;
