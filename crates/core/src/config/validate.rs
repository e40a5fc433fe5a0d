use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Snapshot section exists (enforced by serde)
/// - Snapshot path is not empty
/// - Server port is not 0
/// - Feed paging and interval values are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.snapshot.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "snapshot.path cannot be empty".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Feed validation
    if config.feed.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "feed.page_size cannot be 0".to_string(),
        ));
    }
    if config.feed.page_size > config.feed.total_items {
        return Err(ConfigError::ValidationError(
            "feed.page_size cannot exceed feed.total_items".to_string(),
        ));
    }
    if config.feed.refresh_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "feed.refresh_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, RefresherConfig, ServerConfig, SnapshotConfig};
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            snapshot: SnapshotConfig {
                path: PathBuf::from("snapshot.json"),
            },
            feed: FeedConfig::default(),
            refresher: RefresherConfig::default(),
            server: ServerConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_snapshot_path_fails() {
        let mut config = valid_config();
        config.snapshot.path = PathBuf::new();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_page_size_zero_fails() {
        let mut config = valid_config();
        config.feed.page_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_page_size_larger_than_total_fails() {
        let mut config = valid_config();
        config.feed.total_items = 100;
        config.feed.page_size = 1_000;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = valid_config();
        config.feed.refresh_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
