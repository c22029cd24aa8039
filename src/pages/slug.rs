//! Slug derivation for wiki-page titles.

/// Derive a URL-safe slug from a page title.
///
/// Transliterates to ASCII ("Résumé" becomes "resume"), lowercases, drops
/// apostrophes, and collapses every run of other characters into a single
/// `-`, with none at either end. The result depends only on the title, so a
/// title always maps to the same slug.
pub fn slugify(title: &str) -> String {
  let title: String = title.chars().filter(|c| !matches!(c, '\'' | '\u{2019}')).collect();
  let ascii = deunicode::deunicode_with_tofu(&title, "-");

  let mut slug = String::with_capacity(ascii.len());
  let mut separator_pending = false;

  for c in ascii.chars() {
    if matches!(c, '\'' | '\u{2019}') {
      continue;
    }

    if c.is_ascii_alphanumeric() {
      if separator_pending && !slug.is_empty() {
        slug.push('-');
      }
      separator_pending = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      separator_pending = true;
    }
  }

  slug
}
