pub(crate) mod screenshot;
pub(crate) mod session;

use crate::config::BrowseConfig;
use crate::error::BrowseError;
use crate::requests::{BrowseAccess, PageRequest};
use crate::results::{BatchResult, PageResult};
use futures::future;
use std::time::Duration;
use url::Url;

/// Fetch every requested page concurrently against the resolved endpoint.
///
/// Validation failures reject the whole call before any session starts.
/// After that point no per-request failure can abort the batch: sessions
/// settle independently and a failed one is represented by a synthetic
/// error result at its original index.
pub async fn fetch_pages(
    config: &BrowseConfig,
    access: &BrowseAccess,
    requests: &[PageRequest],
) -> Result<BatchResult, BrowseError> {
    let endpoint = resolve_endpoint(access, config.wss_endpoint.as_deref())?;
    validate_requests(requests)?;

    let worker_host = endpoint_host(&endpoint);
    let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

    ::log::info!(
        "Fetching {} page(s) via {}",
        requests.len(),
        worker_host
    );

    let handles: Vec<_> = requests
        .iter()
        .map(|request| {
            tokio::spawn(session::run(
                endpoint.clone(),
                request.clone(),
                navigation_timeout,
            ))
        })
        .collect();

    // All-settled join: every task runs to completion, failures included.
    let settled = future::join_all(handles).await;

    let pages = settled
        .into_iter()
        .zip(requests)
        .map(|(outcome, request)| match outcome {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => PageResult::failed(&request.url, e.to_string()),
            Err(e) => PageResult::failed(&request.url, format!("worker task failed: {e}")),
        })
        .collect();

    Ok(BatchResult { pages, worker_host })
}

/// Resolve the endpoint from the per-call override or the configured
/// default, requiring a ws:// or wss:// URL.
pub(crate) fn resolve_endpoint(
    access: &BrowseAccess,
    default_endpoint: Option<&str>,
) -> Result<Url, BrowseError> {
    let raw = access
        .wss_endpoint
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            default_endpoint
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .ok_or_else(|| BrowseError::InvalidEndpoint("no endpoint configured".to_string()))?;

    let endpoint =
        Url::parse(raw).map_err(|e| BrowseError::InvalidEndpoint(format!("{raw}: {e}")))?;

    match endpoint.scheme() {
        "ws" | "wss" => Ok(endpoint),
        other => Err(BrowseError::InvalidEndpoint(format!(
            "unsupported scheme {other}://, expected ws:// or wss://"
        ))),
    }
}

/// Every request URL must be absolute; a malformed one rejects the call.
fn validate_requests(requests: &[PageRequest]) -> Result<(), BrowseError> {
    for request in requests {
        Url::parse(&request.url)
            .map_err(|e| BrowseError::InvalidUrl(format!("{}: {e}", request.url)))?;
    }
    Ok(())
}

/// `host[:port]` of the endpoint, reported back as the worker identity.
fn endpoint_host(endpoint: &Url) -> String {
    let host = endpoint.host_str().unwrap_or_default();
    match endpoint.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
