//! Write wiki pages back to a course, updating or creating each one.

use std::fmt;

use tracing::{debug, warn};

use super::WikiPage;
use crate::canvas::{CanvasApi, PageWrite};
use crate::http::ApiError;

/// What an upsert did to the remote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  Updated,
  Created,
}

/// Which request of an upsert failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStep {
  Update,
  Create,
}

/// A page that could not be written.
#[derive(Debug)]
pub struct UpsertError {
  pub step: UpsertStep,
  pub source: ApiError,
}

impl fmt::Display for UpsertError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.step {
      UpsertStep::Update => write!(f, "update failed: {}", self.source),
      UpsertStep::Create => write!(f, "create failed: {}", self.source),
    }
  }
}

impl std::error::Error for UpsertError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}

/// Update the page at `page.slug`, creating it when Canvas reports it
/// missing. Pages are always written as published.
///
/// # Errors
/// Any failure other than a 404 on the update, or any failure of the create.
pub async fn upsert_page(api: &dyn CanvasApi, course_id: u64, page: &WikiPage) -> Result<UpsertOutcome, UpsertError> {
  let write = PageWrite {
    title: page.title.clone(),
    body: page.body.clone(),
    published: true,
  };

  match api.update_page(course_id, &page.slug, &write).await {
    Ok(()) => Ok(UpsertOutcome::Updated),
    Err(err) if err.is_not_found() => {
      debug!(slug = %page.slug, "page not found, creating it");
      api
        .create_page(course_id, &write)
        .await
        .map(|()| UpsertOutcome::Created)
        .map_err(|source| UpsertError {
          step: UpsertStep::Create,
          source,
        })
    }
    Err(source) => Err(UpsertError {
      step: UpsertStep::Update,
      source,
    }),
  }
}

/// Tally of a restore run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreSummary {
  pub updated: usize,
  pub created: usize,
  /// Titles of the pages that could not be written.
  pub failed: Vec<String>,
}

/// Upsert every page in order. A failing page is recorded and skipped.
///
/// `on_result` sees each page together with its outcome as soon as it is
/// known, so callers can report progress.
pub async fn restore_pages<F>(
  api: &dyn CanvasApi,
  course_id: u64,
  pages: &[WikiPage],
  mut on_result: F,
) -> RestoreSummary
where
  F: FnMut(&WikiPage, &Result<UpsertOutcome, UpsertError>),
{
  let mut summary = RestoreSummary::default();

  for page in pages {
    let result = upsert_page(api, course_id, page).await;
    match &result {
      Ok(UpsertOutcome::Updated) => summary.updated += 1,
      Ok(UpsertOutcome::Created) => summary.created += 1,
      Err(err) => {
        warn!(title = %page.title, "skipping page: {err}");
        summary.failed.push(page.title.clone());
      }
    }
    on_result(page, &result);
  }

  summary
}
