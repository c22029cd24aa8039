//! Split a merged document back into wiki pages.

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Node, Selector};

use super::{WikiPage, escape_html, slugify};

/// Split a merged HTML document at its top-level `<h1>` headings.
///
/// Every `<h1>` that is a direct child of `<body>` starts a page; the page
/// body is the serialized markup of the siblings that follow, up to the next
/// such heading. Content before the first heading is dropped and nested
/// headings stay inside their page.
pub fn split_merged_document(html: &str) -> Result<Vec<WikiPage>> {
  let document = Html::parse_document(html);
  let headings = Selector::parse("body > h1").map_err(|err| anyhow!("Invalid heading selector: {err}"))?;

  let pages = document
    .select(&headings)
    .map(|heading| {
      let raw_title: String = heading.text().collect();
      let title = raw_title.trim().to_string();
      let slug = slugify(&title);
      let body = collect_section(heading);
      WikiPage {
        title,
        slug,
        body: body.trim().to_string(),
      }
    })
    .collect();

  Ok(pages)
}

fn collect_section(heading: ElementRef<'_>) -> String {
  let mut body = String::new();

  for node in heading.next_siblings() {
    match node.value() {
      Node::Element(element) if element.name() == "h1" => break,
      Node::Element(_) => {
        if let Some(element) = ElementRef::wrap(node) {
          body.push_str(&element.html());
        }
      }
      Node::Text(text) => body.push_str(&escape_html(text)),
      Node::Comment(comment) => {
        body.push_str("<!--");
        body.push_str(comment);
        body.push_str("-->");
      }
      _ => {}
    }
  }

  body
}
