//! Course wiki pages: merge into one document, split it back apart, and
//! restore the pieces to Canvas.

pub mod merge;
pub mod restore;
pub mod slug;
pub mod split;

pub use merge::{NO_CONTENT_PLACEHOLDER, fetch_course_pages, render_merged_document};
pub use restore::{RestoreSummary, UpsertError, UpsertOutcome, UpsertStep, restore_pages, upsert_page};
pub use slug::slugify;
pub use split::split_merged_document;

/// A wiki page as it travels through merge and restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
  pub title: String,
  /// Canvas URL slug the page is written to.
  pub slug: String,
  /// HTML fragment.
  pub body: String,
}

impl WikiPage {
  pub fn new(title: impl Into<String>, slug: impl Into<String>, body: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      slug: slug.into(),
      body: body.into(),
    }
  }
}

/// Escape text for inclusion in HTML element content.
pub(crate) fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      _ => escaped.push(c),
    }
  }
  escaped
}
