use std::sync::Arc;

use marquee_core::{CatalogCache, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    cache: Arc<CatalogCache>,
}

impl AppState {
    pub fn new(config: Config, cache: Arc<CatalogCache>) -> Self {
        Self { config, cache }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The read-only view of the catalog served to clients.
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }
}
