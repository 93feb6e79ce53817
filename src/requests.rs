use serde::{Deserialize, Serialize};
use std::fmt;

/// Access descriptor for a batch fetch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseAccess {
    /// Protocol dialect; only CDP-over-websocket is supported.
    pub dialect: BrowseDialect,

    /// Per-call endpoint override. When absent, the process-wide default
    /// from the configuration is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wss_endpoint: Option<String>,
}

impl BrowseAccess {
    /// Create an access descriptor, optionally overriding the endpoint.
    pub fn new(wss_endpoint: Option<String>) -> Self {
        Self {
            dialect: BrowseDialect::BrowseWss,
            wss_endpoint,
        }
    }
}

/// Supported remote-browser dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowseDialect {
    BrowseWss,
}

/// One content-extraction strategy applied to a loaded page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Full rendered markup, sanitized.
    Html,
    /// Visible-text projection of the page body.
    Text,
    /// Sanitized markup converted to Markdown with ATX headings.
    Markdown,
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transform::Html => "html",
            Transform::Text => "text",
            Transform::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Requested screenshot dimensions and encoder quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotRequest {
    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Lossy encoder quality (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
}

/// One page to fetch: an absolute URL, the representations to extract,
/// and an optional screenshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Absolute URL of the target page.
    pub url: String,

    /// Representations to derive from the loaded page.
    #[serde(default)]
    pub transforms: Vec<Transform>,

    /// Optional scaled screenshot of the viewport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotRequest>,
}

impl PageRequest {
    /// Create a request for the given URL with the given transforms.
    pub fn new(url: impl Into<String>, transforms: Vec<Transform>) -> Self {
        Self {
            url: url.into(),
            transforms,
            screenshot: None,
        }
    }

    /// Attach a screenshot request.
    pub fn with_screenshot(mut self, screenshot: ScreenshotRequest) -> Self {
        self.screenshot = Some(screenshot);
        self
    }
}
