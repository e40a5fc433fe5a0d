use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Default remote feed endpoint.
pub const DEFAULT_FEED_URL: &str =
    "https://feed.entertainment.tv.theplatform.eu/f/jGxigC/bb-all-pas?form=json&lang=da";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub refresher: RefresherConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Snapshot file configuration. The path is the one required setting.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    pub path: PathBuf,
}

/// Remote feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Feed endpoint; the item range is appended as a query parameter.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound of the item range swept per refresh cycle.
    #[serde(default = "default_total_items")]
    pub total_items: u32,
    /// Items requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How long a refresh result stays fresh, and how long the refresher
    /// sleeps between wake-ups.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            total_items: default_total_items(),
            page_size: default_page_size(),
            refresh_interval_ms: default_refresh_interval_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_total_items() -> u32 {
    10_000
}

fn default_page_size() -> u32 {
    1_000
}

fn default_refresh_interval_ms() -> u64 {
    900_000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    60
}

/// Refresher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefresherConfig {
    /// Disable to serve only what the snapshot already holds (useful in
    /// tests and for read-only replicas).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Config as reported by the API (nothing here is secret, but the shape is
/// kept separate so internals can change without changing the endpoint).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub snapshot_path: String,
    pub feed: SanitizedFeedConfig,
    pub refresher_enabled: bool,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFeedConfig {
    pub base_url: String,
    pub total_items: u32,
    pub page_size: u32,
    pub refresh_interval_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            snapshot_path: config.snapshot.path.display().to_string(),
            feed: SanitizedFeedConfig {
                base_url: config.feed.base_url.clone(),
                total_items: config.feed.total_items,
                page_size: config.feed.page_size,
                refresh_interval_ms: config.feed.refresh_interval_ms,
            },
            refresher_enabled: config.refresher.enabled,
            server: config.server.clone(),
        }
    }
}
