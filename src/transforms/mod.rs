pub mod markdown;
pub mod sanitize;
pub mod text;

#[cfg(test)]
mod tests;

use crate::error::BrowseError;
use crate::requests::Transform;
use chromiumoxide::Page;

/// Derive one representation from the loaded page.
///
/// Each transform re-reads the page markup rather than sharing a cached
/// copy; transforms never observe each other's state, so a failure in one
/// cannot affect another.
pub async fn extract(page: &Page, kind: Transform) -> Result<String, BrowseError> {
    match kind {
        Transform::Html => {
            let markup = page.content().await?;
            Ok(sanitize::clean_html(&markup))
        }
        Transform::Text => text::visible_text(page).await,
        Transform::Markdown => {
            let markup = page.content().await?;
            markdown::convert(&sanitize::clean_html(&markup))
        }
    }
}
