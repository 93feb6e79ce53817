use crate::error::BrowseError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the page-fetch worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Default browser endpoint (`ws://` or `wss://`), used when a call
    /// carries no per-call override
    #[serde(default)]
    pub wss_endpoint: Option<String>,

    /// Timeout in seconds applied to connection setup and page navigation
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,
}

impl BrowseConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            wss_endpoint: None,
            navigation_timeout_secs: default_navigation_timeout_secs(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BrowseError> {
        let mut file = File::open(&path)
            .map_err(|e| BrowseError::Config(format!("{}: {e}", path.as_ref().display())))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BrowseError::Config(format!("{}: {e}", path.as_ref().display())))?;

        serde_json::from_str(&contents).map_err(|e| BrowseError::Config(e.to_string()))
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Default value for navigation_timeout_secs
fn default_navigation_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowseConfig::new();

        assert!(config.wss_endpoint.is_none());
        assert_eq!(config.navigation_timeout_secs, 10);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BrowseConfig =
            serde_json::from_str(r#"{"wss_endpoint":"ws://localhost:9222"}"#).unwrap();

        assert_eq!(config.wss_endpoint.as_deref(), Some("ws://localhost:9222"));
        assert_eq!(config.navigation_timeout_secs, 10);
    }
}
