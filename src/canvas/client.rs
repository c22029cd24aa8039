//! HTTP client implementation for talking to the Canvas REST API.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use super::api::CanvasApi;
use super::models::{Assignment, AssignmentGroup, PageRecord, PageSummary, PageWrite};
use crate::http::{ApiError, ApiRequest, ReqwestTransport, Transport, get_paginated};

/// Canvas API client authenticated with a personal access token.
#[derive(Clone)]
pub struct CanvasClient {
  base_url: String,
  token: String,
  transport: Arc<dyn Transport>,
}

impl CanvasClient {
  /// Create a new Canvas client.
  ///
  /// # Arguments
  /// * `base_url` - API root including the version segment (e.g., https://school.instructure.com/api/v1)
  /// * `token` - Personal access token sent as a bearer token
  /// * `timeout_secs` - Request timeout in seconds
  ///
  /// # Errors
  /// Returns an error if the underlying HTTP client cannot be built.
  pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout_secs: u64) -> Result<Self> {
    let transport = ReqwestTransport::new(timeout_secs, false)?;
    Ok(Self::with_transport(base_url, token, Arc::new(transport)))
  }

  /// Create a client over an existing transport.
  pub fn with_transport(base_url: impl Into<String>, token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self {
      base_url,
      token: token.into(),
      transport,
    }
  }

  fn course_url(&self, course_id: u64, path: &str) -> String {
    format!("{}/courses/{}/{}", self.base_url, course_id, path)
  }

  async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
    let response = self
      .transport
      .send(request.bearer(Some(self.token.as_str())))
      .await?
      .error_for_status()?;

    if response.body.trim().is_empty() {
      return Ok(serde_json::Value::Null);
    }
    response.json()
  }
}

#[async_trait]
impl CanvasApi for CanvasClient {
  async fn list_pages(&self, course_id: u64) -> Result<Vec<PageSummary>, ApiError> {
    get_paginated(self.transport.as_ref(), &self.course_url(course_id, "pages"), Some(self.token.as_str())).await
  }

  async fn get_page(&self, course_id: u64, slug: &str) -> Result<PageRecord, ApiError> {
    let value = self
      .send(ApiRequest::get(self.course_url(course_id, &format!("pages/{slug}"))))
      .await?;
    Ok(serde_json::from_value(value)?)
  }

  async fn update_page(&self, course_id: u64, slug: &str, page: &PageWrite) -> Result<(), ApiError> {
    let url = self.course_url(course_id, &format!("pages/{slug}"));
    self.send(ApiRequest::put(url, json!({ "wiki_page": page }))).await?;
    Ok(())
  }

  async fn create_page(&self, course_id: u64, page: &PageWrite) -> Result<(), ApiError> {
    let url = self.course_url(course_id, "pages");
    self.send(ApiRequest::post(url, json!({ "wiki_page": page }))).await?;
    Ok(())
  }

  async fn list_assignment_groups(&self, course_id: u64) -> Result<Vec<AssignmentGroup>, ApiError> {
    get_paginated(
      self.transport.as_ref(),
      &self.course_url(course_id, "assignment_groups"),
      Some(self.token.as_str()),
    )
    .await
  }

  async fn list_assignments(&self, course_id: u64, group_id: u64) -> Result<Vec<Assignment>, ApiError> {
    get_paginated(
      self.transport.as_ref(),
      &self.course_url(course_id, &format!("assignment_groups/{group_id}/assignments")),
      Some(self.token.as_str()),
    )
    .await
  }

  async fn get_assignment(&self, course_id: u64, assignment_id: u64) -> Result<serde_json::Value, ApiError> {
    self
      .send(ApiRequest::get(
        self.course_url(course_id, &format!("assignments/{assignment_id}")),
      ))
      .await
  }

  async fn update_assignment_position(
    &self,
    course_id: u64,
    assignment_id: u64,
    position: usize,
  ) -> Result<(), ApiError> {
    let url = self.course_url(course_id, &format!("assignments/{assignment_id}"));
    self
      .send(ApiRequest::put(url, json!({ "assignment": { "position": position } })))
      .await?;
    Ok(())
  }
}
