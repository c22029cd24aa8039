//! Cursor-style pagination over the `Link` response header.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{ApiError, ApiRequest, Transport};

/// Fetch every page of a paginated listing.
///
/// Issues a `GET` for `url`, parses the body as a JSON array, then follows the
/// `rel="next"` link until the server stops sending one. Items are returned in
/// the order the server served them.
///
/// # Arguments
/// * `transport` - Transport used for every page request.
/// * `url` - Absolute URL of the first page.
/// * `bearer` - Optional bearer token attached to each request.
///
/// # Errors
/// Any non-2xx response aborts the whole fetch; no partial result is returned.
pub async fn get_paginated<T: DeserializeOwned>(
  transport: &dyn Transport,
  url: &str,
  bearer: Option<&str>,
) -> Result<Vec<T>, ApiError> {
  let mut results = Vec::new();
  let mut next = Some(url.to_string());
  let mut page_count = 0usize;

  while let Some(current) = next.take() {
    let response = transport
      .send(ApiRequest::get(current.as_str()).bearer(bearer))
      .await?
      .error_for_status()?;

    let mut items: Vec<T> = response.json()?;
    page_count += 1;
    debug!(page = page_count, items = items.len(), "fetched listing page");
    results.append(&mut items);

    if let Some(target) = response.link.as_deref().and_then(parse_next_link) {
      next = Some(resolve_link(&current, &target)?);
    }
  }

  Ok(results)
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Handles several comma-separated link-values, quoted or bare `rel`
/// parameters, and relation lists such as `rel="next last"`.
pub fn parse_next_link(header: &str) -> Option<String> {
  let mut rest = header;

  while let Some(start) = rest.find('<') {
    let after = &rest[start + 1..];
    let end = after.find('>')?;
    let target = after[..end].trim();
    let tail = &after[end + 1..];
    let params_end = tail.find('<').unwrap_or(tail.len());

    if tail[..params_end].split(';').any(is_next_relation) {
      return Some(target.to_string());
    }

    rest = &tail[params_end..];
  }

  None
}

fn is_next_relation(param: &str) -> bool {
  let Some((key, value)) = param.split_once('=') else {
    return false;
  };

  key.trim().eq_ignore_ascii_case("rel")
    && value
      .trim()
      .trim_end_matches(',')
      .trim_matches('"')
      .split_whitespace()
      .any(|relation| relation.eq_ignore_ascii_case("next"))
}

/// Resolve a (possibly relative) link target against the URL it came from.
fn resolve_link(current: &str, target: &str) -> Result<String, ApiError> {
  let base = Url::parse(current).map_err(|e| ApiError::InvalidUrl(format!("{current}: {e}")))?;
  base
    .join(target)
    .map(String::from)
    .map_err(|e| ApiError::InvalidUrl(format!("{target}: {e}")))
}
