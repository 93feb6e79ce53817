use thiserror::Error;

/// Errors raised while fetching pages through a remote browser.
///
/// Only `InvalidEndpoint`, `InvalidUrl` and `Connect` ever reach the caller
/// of a batch fetch; everything else is captured into the per-page result.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The resolved endpoint is missing, malformed, or not ws://-style.
    #[error("Invalid wss:// endpoint: {0}")]
    InvalidEndpoint(String),

    /// A request URL failed validation before any session was started.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The remote browser could not be reached.
    #[error("Browser connection failed: {0}")]
    Connect(String),

    /// A protocol command could not be constructed or executed.
    #[error("Browser protocol error: {0}")]
    Protocol(String),

    /// Error surfaced by the CDP client.
    #[error(transparent)]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// An in-page script evaluation failed or returned an unusable value.
    #[error("Script evaluation failed: {0}")]
    Evaluate(String),

    /// HTML-to-Markdown conversion failed.
    #[error("Markdown conversion failed: {0}")]
    Markdown(String),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),
}
