// Re-export modules
pub mod config;
pub mod error;
pub mod requests;
pub mod results;
pub mod transforms;
pub mod worker;

// Re-export commonly used types for convenience
pub use config::BrowseConfig;
pub use error::BrowseError;
pub use requests::{BrowseAccess, BrowseDialect, PageRequest, ScreenshotRequest, Transform};
pub use results::{BatchResult, PageResult, ScreenshotResult, StopReason};

use std::path::Path;

/// Main builder for batch page fetches against a remote browser endpoint.
///
/// The process-wide default endpoint and the fixed navigation timeout are
/// injected here at construction; nothing is read from ambient state.
pub struct Browse {
    config: BrowseConfig,
}

impl Browse {
    /// Create a fetcher with default configuration
    pub fn new() -> Self {
        Self {
            config: BrowseConfig::new(),
        }
    }

    /// Set the default endpoint used when a call carries no override
    pub fn with_default_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.wss_endpoint = Some(endpoint.into());
        self
    }

    /// Set the connection and navigation timeout in seconds
    pub fn with_navigation_timeout(mut self, seconds: u64) -> Self {
        self.config.navigation_timeout_secs = seconds;
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: BrowseConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, BrowseError> {
        let config = BrowseConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Fetch all requested pages concurrently and return the settled batch
    pub async fn fetch(
        &self,
        access: &BrowseAccess,
        requests: &[PageRequest],
    ) -> Result<BatchResult, BrowseError> {
        worker::fetch_pages(&self.config, access, requests).await
    }
}

impl Default for Browse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_injects_endpoint_and_timeout() {
        let browse = Browse::new()
            .with_default_endpoint("wss://pool.example.com")
            .with_navigation_timeout(5);

        assert_eq!(
            browse.config.wss_endpoint.as_deref(),
            Some("wss://pool.example.com")
        );
        assert_eq!(browse.config.navigation_timeout_secs, 5);
    }
}
