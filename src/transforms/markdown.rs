use crate::error::BrowseError;

/// Convert sanitized HTML to Markdown with ATX-style (`#`) headings.
pub fn convert(html: &str) -> Result<String, BrowseError> {
    htmd::convert(html).map_err(|e| BrowseError::Markdown(e.to_string()))
}
