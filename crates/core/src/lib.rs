pub mod catalog;
pub mod config;
pub mod feed;
pub mod metrics;
pub mod refresher;
pub mod snapshot;
pub mod testing;

pub use catalog::{normalize, CatalogCache, Entry, PersistOutcome, RangeError};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use feed::{FeedError, FeedSource, HttpFeedSource};
pub use refresher::{CycleOutcome, Refresher};
pub use snapshot::{SnapshotDocument, SnapshotError, SnapshotStore};
