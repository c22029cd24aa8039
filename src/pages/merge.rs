//! Merge every wiki page of a course into one HTML document.

use anyhow::{Context, Result};
use tracing::info;

use super::{WikiPage, escape_html};
use crate::canvas::CanvasApi;

/// Body emitted for pages that have no content.
pub const NO_CONTENT_PLACEHOLDER: &str = "<p><em>No content</em></p>";

const DOCUMENT_HEAD: &str = r#"<html><head><meta charset="utf-8"><title>Course Pages</title></head><body>"#;
const DOCUMENT_TAIL: &str = "</body></html>";

/// Fetch every wiki page of a course, in listing order.
///
/// Titles come from the listing and bodies from the per-page fetch; a `null`
/// body becomes an empty string.
///
/// # Errors
/// Fails on the first listing or page fetch that fails.
pub async fn fetch_course_pages(api: &dyn CanvasApi, course_id: u64) -> Result<Vec<WikiPage>> {
  let listing = api
    .list_pages(course_id)
    .await
    .with_context(|| format!("Failed to list wiki pages of course {course_id}"))?;

  let mut pages = Vec::with_capacity(listing.len());
  for summary in listing {
    info!("Fetching page: {}", summary.title);
    let record = api
      .get_page(course_id, &summary.url)
      .await
      .with_context(|| format!("Failed to fetch page '{}'", summary.title))?;

    pages.push(WikiPage {
      title: summary.title,
      slug: summary.url,
      body: record.body.unwrap_or_default(),
    });
  }

  Ok(pages)
}

/// Render pages as one document: each page is an `<h1>` with its title
/// followed by its body, one part per line.
pub fn render_merged_document(pages: &[WikiPage]) -> String {
  let mut parts = Vec::with_capacity(pages.len() * 2 + 2);
  parts.push(DOCUMENT_HEAD.to_string());

  for page in pages {
    parts.push(format!("<h1>{}</h1>", escape_html(&page.title)));
    if page.body.trim().is_empty() {
      parts.push(NO_CONTENT_PLACEHOLDER.to_string());
    } else {
      parts.push(page.body.clone());
    }
  }

  parts.push(DOCUMENT_TAIL.to_string());
  parts.join("\n")
}
