use crate::requests::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why page processing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Navigation completed and the response was page-like content.
    End,
    /// Navigation exceeded the fixed timeout. Expected, carries no error.
    Timeout,
    /// Any other failure; the `error` field carries the message unless the
    /// content map is empty after attempting every requested transform.
    Error,
}

/// A captured screenshot encoded for inline transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotResult {
    /// `data:image/webp;base64,...` URI of the captured image.
    pub img_data_url: String,

    /// Image MIME type.
    pub mime_type: String,

    /// Requested output width in pixels.
    pub width: u32,

    /// Requested output height in pixels.
    pub height: u32,
}

/// Result of processing one page request. Produced exactly once per
/// request and never mutated after being returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// URL the request targeted.
    pub url: String,

    /// Page title, empty when unavailable.
    #[serde(default)]
    pub title: String,

    /// Extracted representations, keyed by transform. Only transforms that
    /// were requested and succeeded appear here.
    #[serde(default)]
    pub content: BTreeMap<Transform, String>,

    /// Failure message, absent for clean completions and for timeouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Outcome classification.
    pub stop_reason: StopReason,

    /// Screenshot, present only when requested and captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotResult>,
}

impl PageResult {
    /// A result in its initial state: no content, classified as `error`
    /// until navigation proves otherwise.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            content: BTreeMap::new(),
            error: None,
            stop_reason: StopReason::Error,
            screenshot: None,
        }
    }

    /// Synthetic result for a request whose session failed before it could
    /// produce anything.
    pub fn failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = Self::new(url);
        result.error = Some(message.into());
        result
    }
}

/// Aggregate response for one batch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// One result per request, in request order, regardless of failures.
    pub pages: Vec<PageResult>,

    /// `host[:port]` of the resolved browser endpoint.
    pub worker_host: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_wire_names() {
        assert_eq!(serde_json::to_value(StopReason::End).unwrap(), "end");
        assert_eq!(serde_json::to_value(StopReason::Timeout).unwrap(), "timeout");
        assert_eq!(serde_json::to_value(StopReason::Error).unwrap(), "error");
    }

    #[test]
    fn test_page_result_field_names() {
        let mut result = PageResult::new("https://example.com");
        result.stop_reason = StopReason::End;
        result.content.insert(Transform::Text, "hello".to_string());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stopReason"], "end");
        assert_eq!(json["content"]["text"], "hello");
        // no error, so the key is omitted entirely
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_screenshot_field_names() {
        let shot = ScreenshotResult {
            img_data_url: "data:image/webp;base64,AAAA".to_string(),
            mime_type: "image/webp".to_string(),
            width: 800,
            height: 600,
        };

        let json = serde_json::to_value(&shot).unwrap();
        assert!(
            json["imgDataUrl"]
                .as_str()
                .unwrap()
                .starts_with("data:image/webp")
        );
        assert_eq!(json["mimeType"], "image/webp");
    }

    #[test]
    fn test_failed_result_carries_message_and_error_stop() {
        let result = PageResult::failed("https://example.com", "connection refused");

        assert_eq!(result.stop_reason, StopReason::Error);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert!(result.content.is_empty());
    }
}
