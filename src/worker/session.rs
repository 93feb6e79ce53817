use crate::error::BrowseError;
use crate::requests::{PageRequest, Transform};
use crate::results::{PageResult, StopReason};
use crate::transforms;
use crate::worker::screenshot;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::{EventResponseReceived, ResourceType};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::{Browser, Page};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use url::Url;

/// How long to wait for the navigation's document response event after the
/// navigation itself has completed. The event is normally already buffered.
const RESPONSE_SETTLE: Duration = Duration::from_millis(500);

/// Drive one page request end to end: connect, navigate, classify, extract,
/// capture, tear down.
///
/// Never returns `Err` once a page exists; every later failure is folded
/// into the returned result. Setup failures (connection, context, page
/// creation) are the exception and are mapped by the orchestrator into a
/// synthetic error result.
pub(crate) async fn run(
    endpoint: Url,
    request: PageRequest,
    navigation_timeout: Duration,
) -> Result<PageResult, BrowseError> {
    let connect = Browser::connect(endpoint.as_str());
    let (browser, mut handler) = match timeout(navigation_timeout, connect).await {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => return Err(BrowseError::Connect(e.to_string())),
        Err(_) => {
            return Err(BrowseError::Connect(format!(
                "timed out connecting to {endpoint}"
            )));
        }
    };
    let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

    // Unencrypted ws:// endpoints denote a locally owned browser; pooled
    // wss:// providers isolate sessions themselves and stay untouched.
    let owns_browser = endpoint.scheme() == "ws";

    let context_id = if owns_browser {
        match browser.execute(CreateBrowserContextParams::default()).await {
            Ok(response) => Some(response.result.browser_context_id.clone()),
            Err(e) => {
                handler_task.abort();
                return Err(BrowseError::Connect(format!(
                    "browser context creation failed: {e}"
                )));
            }
        }
    } else {
        None
    };

    let page = match new_page(&browser, context_id.clone()).await {
        Ok(page) => page,
        Err(e) => {
            handler_task.abort();
            return Err(e);
        }
    };

    let mut result = process(&page, &request, navigation_timeout).await;

    // Best-effort and strictly additive: capture failures are logged but
    // never surface in the result.
    if let Some(shot) = &request.screenshot {
        match screenshot::capture(&page, shot).await {
            Ok(image) => result.screenshot = Some(image),
            Err(e) => ::log::error!("Screenshot capture failed for {}: {}", request.url, e),
        }
    }

    teardown(page, browser, context_id, owns_browser, handler_task).await;

    Ok(result)
}

/// Open the session's page, inside the isolated context when one exists.
async fn new_page(
    browser: &Browser,
    context_id: Option<BrowserContextId>,
) -> Result<Page, BrowseError> {
    let page = match context_id {
        Some(id) => {
            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(id)
                .build()
                .map_err(BrowseError::Protocol)?;
            browser.new_page(target).await?
        }
        None => browser.new_page("about:blank").await?,
    };
    Ok(page)
}

/// Navigate, classify the outcome, and run the requested transforms.
async fn process(page: &Page, request: &PageRequest, navigation_timeout: Duration) -> PageResult {
    let mut result = PageResult::new(&request.url);

    // Subscribe before navigating so the document response is not missed.
    let mut responses = match page.event_listener::<EventResponseReceived>().await {
        Ok(stream) => Some(stream),
        Err(e) => {
            ::log::warn!("Response listener unavailable for {}: {}", request.url, e);
            None
        }
    };

    match timeout(navigation_timeout, navigate(page, &request.url)).await {
        Ok(navigation) => {
            let mime = match (&navigation, responses.as_mut()) {
                (Ok(()), Some(stream)) => document_mime_type(stream).await,
                _ => None,
            };
            settle_navigation(&mut result, Some(navigation), mime.as_deref());
        }
        Err(_) => settle_navigation(&mut result, None, None),
    }

    if result.stop_reason != StopReason::Error {
        match page.get_title().await {
            Ok(title) => result.title = title.unwrap_or_default(),
            Err(e) => ::log::debug!("Title fetch failed for {}: {}", request.url, e),
        }

        run_transforms(page, &request.transforms, &mut result).await;
    }

    result
}

/// Navigate and wait for the page to settle.
async fn navigate(page: &Page, url: &str) -> Result<(), BrowseError> {
    page.goto(url).await?;
    page.wait_for_navigation().await?;
    Ok(())
}

/// Pull the first document response off the event stream, bounded so a page
/// with no document response cannot stall the session.
async fn document_mime_type(
    events: &mut (impl Stream<Item = Arc<EventResponseReceived>> + Unpin),
) -> Option<String> {
    timeout(RESPONSE_SETTLE, async {
        while let Some(event) = events.next().await {
            if matches!(event.r#type, ResourceType::Document) {
                return Some(event.response.mime_type.clone());
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

/// Fold the settled navigation outcome into the result. `None` means the
/// navigation timed out, which is expected and carries no error message.
fn settle_navigation(
    result: &mut PageResult,
    navigation: Option<Result<(), BrowseError>>,
    mime: Option<&str>,
) {
    match navigation {
        Some(Ok(())) => {
            let (stop_reason, error) = classify(mime);
            result.stop_reason = stop_reason;
            result.error = error;
        }
        Some(Err(e)) => {
            result.stop_reason = StopReason::Error;
            result.error = Some(e.to_string());
        }
        None => result.stop_reason = StopReason::Timeout,
    }
}

/// Classify a completed navigation by its document response's MIME type.
fn classify(mime: Option<&str>) -> (StopReason, Option<String>) {
    match mime {
        Some(m) if is_page_like(m) => (StopReason::End, None),
        other => (
            StopReason::Error,
            Some(format!(
                "Invalid content-type: {}",
                other.unwrap_or("unknown")
            )),
        ),
    }
}

/// Only HTML and plain text are worth extracting; anything else (PDFs,
/// images, downloads) is rejected even though navigation succeeded.
fn is_page_like(mime: &str) -> bool {
    mime.starts_with("text/html") || mime.starts_with("text/plain")
}

/// Run each requested transform in isolation and settle the outcomes.
async fn run_transforms(page: &Page, requested: &[Transform], result: &mut PageResult) {
    let mut outcomes = Vec::with_capacity(requested.len());
    for transform in requested {
        outcomes.push((*transform, transforms::extract(page, *transform).await));
    }
    settle_transforms(requested, outcomes, result);
}

/// Record per-transform outcomes and aggregate failures only when nothing
/// at all was produced.
fn settle_transforms(
    requested: &[Transform],
    outcomes: Vec<(Transform, Result<String, BrowseError>)>,
    result: &mut PageResult,
) {
    let mut failures = Vec::new();

    for (transform, outcome) in outcomes {
        match outcome {
            Ok(value) => {
                result.content.insert(transform, value);
            }
            Err(e) => {
                ::log::warn!("{} transform failed for {}: {}", transform, result.url, e);
                failures.push(format!("{transform}: {e}"));
            }
        }
    }

    // Partial success is success; only a fully empty outcome is an error.
    if !requested.is_empty() && result.content.is_empty() {
        result.error = Some(if failures.is_empty() {
            "Empty content".to_string()
        } else {
            failures.join("; ")
        });
    }
}

/// Release everything in reverse acquisition order. Each stage is guarded
/// so one failure never prevents the stages after it.
async fn teardown(
    page: Page,
    mut browser: Browser,
    context_id: Option<BrowserContextId>,
    owns_browser: bool,
    handler_task: JoinHandle<()>,
) {
    if let Err(e) = page.close().await {
        ::log::warn!("Page close failed: {}", e);
    }

    if let Some(id) = context_id {
        if let Err(e) = browser.execute(DisposeBrowserContextParams::new(id)).await {
            ::log::warn!("Browser context dispose failed: {}", e);
        }
    }

    if owns_browser {
        if let Err(e) = browser.close().await {
            ::log::warn!("Browser close failed: {}", e);
        }
        if let Err(e) = browser.wait().await {
            ::log::warn!("Browser wait failed: {}", e);
        }
    }

    // For pooled endpoints dropping the connection is the disconnect; the
    // remote browser process stays alive for reuse.
    handler_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_like_mime_types() {
        assert!(is_page_like("text/html"));
        assert!(is_page_like("text/html; charset=utf-8"));
        assert!(is_page_like("text/plain"));
    }

    #[test]
    fn test_non_page_mime_types_rejected() {
        assert!(!is_page_like("application/pdf"));
        assert!(!is_page_like("image/png"));
        assert!(!is_page_like("application/octet-stream"));
        assert!(!is_page_like(""));
    }

    #[test]
    fn test_classify_html_response_as_end() {
        assert_eq!(
            classify(Some("text/html; charset=utf-8")),
            (StopReason::End, None)
        );
    }

    #[test]
    fn test_classify_pdf_response_as_error() {
        let (stop_reason, error) = classify(Some("application/pdf"));

        assert_eq!(stop_reason, StopReason::Error);
        assert_eq!(
            error.as_deref(),
            Some("Invalid content-type: application/pdf")
        );
    }

    #[test]
    fn test_classify_missing_response_as_unknown() {
        let (stop_reason, error) = classify(None);

        assert_eq!(stop_reason, StopReason::Error);
        assert_eq!(error.as_deref(), Some("Invalid content-type: unknown"));
    }

    #[test]
    fn test_timeout_leaves_error_unset() {
        let mut result = PageResult::new("https://example.com");

        settle_navigation(&mut result, None, None);

        assert_eq!(result.stop_reason, StopReason::Timeout);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_navigation_failure_carries_message() {
        let mut result = PageResult::new("https://example.com");

        settle_navigation(
            &mut result,
            Some(Err(BrowseError::Protocol("net::ERR_NAME_NOT_RESOLVED".to_string()))),
            None,
        );

        assert_eq!(result.stop_reason, StopReason::Error);
        assert!(result.error.as_deref().unwrap().contains("ERR_NAME_NOT_RESOLVED"));
    }

    #[test]
    fn test_partial_transform_failure_is_not_an_error() {
        let mut result = PageResult::new("https://example.com");
        let requested = [Transform::Text, Transform::Html];
        let outcomes = vec![
            (
                Transform::Text,
                Err(BrowseError::Evaluate("script blew up".to_string())),
            ),
            (Transform::Html, Ok("<p>kept</p>".to_string())),
        ];

        settle_transforms(&requested, outcomes, &mut result);

        assert_eq!(result.content.get(&Transform::Html).unwrap(), "<p>kept</p>");
        assert!(!result.content.contains_key(&Transform::Text));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_all_transforms_failing_joins_messages() {
        let mut result = PageResult::new("https://example.com");
        let requested = [Transform::Text, Transform::Markdown];
        let outcomes = vec![
            (
                Transform::Text,
                Err(BrowseError::Evaluate("no body".to_string())),
            ),
            (
                Transform::Markdown,
                Err(BrowseError::Markdown("bad markup".to_string())),
            ),
        ];

        settle_transforms(&requested, outcomes, &mut result);

        assert!(result.content.is_empty());
        let message = result.error.unwrap();
        assert!(message.contains("text:"));
        assert!(message.contains("markdown:"));
        assert!(message.contains("; "));
    }

    #[test]
    fn test_no_output_and_no_failures_reports_empty_content() {
        let mut result = PageResult::new("https://example.com");

        settle_transforms(&[Transform::Text], Vec::new(), &mut result);

        assert_eq!(result.error.as_deref(), Some("Empty content"));
    }

    #[test]
    fn test_no_requested_transforms_is_not_an_error() {
        let mut result = PageResult::new("https://example.com");

        settle_transforms(&[], Vec::new(), &mut result);

        assert!(result.error.is_none());
    }
}
