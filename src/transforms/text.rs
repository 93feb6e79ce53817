use crate::error::BrowseError;
use chromiumoxide::Page;

/// Visible-text projection, falling back to the full text content when
/// `innerText` is unavailable (e.g. detached or non-rendered documents).
const VISIBLE_TEXT_JS: &str = "document.body.innerText || document.textContent || ''";

/// Evaluate the visible text of the loaded page.
pub async fn visible_text(page: &Page) -> Result<String, BrowseError> {
    page.evaluate(VISIBLE_TEXT_JS)
        .await?
        .into_value::<String>()
        .map_err(|e| BrowseError::Evaluate(e.to_string()))
}
