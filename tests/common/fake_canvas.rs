//! Fake Canvas API client for testing
//!
//! An in-memory course that answers like the Canvas REST API and records
//! every write, without making any network requests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use coursekit::canvas::{Assignment, AssignmentGroup, CanvasApi, PageRecord, PageSummary, PageWrite};
use coursekit::http::ApiError;
use coursekit::pages::slugify;
use serde_json::Value;

use crate::common::fixtures;

/// A write or metadata fetch the fake received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  UpdatePage { slug: String, title: String, body: String },
  CreatePage { title: String, body: String },
  GetAssignment { assignment_id: u64 },
  SetPosition { assignment_id: u64, position: usize },
}

/// A fake Canvas course
pub struct FakeCanvasClient {
  pages: Mutex<Vec<PageRecord>>,
  groups: Vec<AssignmentGroup>,
  assignments: HashMap<u64, Vec<Assignment>>,
  failing_pages: HashSet<String>,
  failing_assignments: HashSet<u64>,
  calls: Mutex<Vec<Call>>,
}

impl FakeCanvasClient {
  /// Create a fake course with no pages and no assignments
  pub fn new() -> Self {
    Self {
      pages: Mutex::new(Vec::new()),
      groups: Vec::new(),
      assignments: HashMap::new(),
      failing_pages: HashSet::new(),
      failing_assignments: HashSet::new(),
      calls: Mutex::new(Vec::new()),
    }
  }

  /// Create a fake course holding the sample pages and assignments
  pub fn with_sample_course() -> Self {
    let mut client = Self::new();

    let pages: Vec<PageRecord> = serde_json::from_value(fixtures::sample_pages()).unwrap();
    for page in pages {
      client.add_page(page);
    }

    client.groups = serde_json::from_value(fixtures::sample_assignment_groups()).unwrap();
    client.assignments.insert(1, Vec::new());
    client
      .assignments
      .insert(2, serde_json::from_value(fixtures::sample_quiz_assignments()).unwrap());

    client
  }

  pub fn add_page(&mut self, page: PageRecord) {
    self.pages.get_mut().unwrap().push(page);
  }

  pub fn add_group(&mut self, group: AssignmentGroup, assignments: Vec<Assignment>) {
    self.assignments.insert(group.id, assignments);
    self.groups.push(group);
  }

  /// Make every write to the page at `slug` fail with a server error
  pub fn fail_page(&mut self, slug: &str) {
    self.failing_pages.insert(slug.to_string());
  }

  /// Make position updates of `assignment_id` fail with a server error
  pub fn fail_assignment(&mut self, assignment_id: u64) {
    self.failing_assignments.insert(assignment_id);
  }

  /// Writes and metadata fetches received so far, in order
  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  /// Current state of a page
  pub fn page(&self, slug: &str) -> Option<PageRecord> {
    self.pages.lock().unwrap().iter().find(|p| p.url == slug).cloned()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }

  fn find_assignment(&self, assignment_id: u64) -> Option<&Assignment> {
    self.assignments.values().flatten().find(|a| a.id == assignment_id)
  }
}

impl Default for FakeCanvasClient {
  fn default() -> Self {
    Self::new()
  }
}

fn not_found() -> ApiError {
  ApiError::Status {
    status: 404,
    body: r#"{"errors":[{"message":"The specified resource does not exist."}]}"#.to_string(),
  }
}

fn server_error() -> ApiError {
  ApiError::Status {
    status: 500,
    body: "Internal Server Error".to_string(),
  }
}

#[async_trait]
impl CanvasApi for FakeCanvasClient {
  async fn list_pages(&self, _course_id: u64) -> Result<Vec<PageSummary>, ApiError> {
    Ok(
      self
        .pages
        .lock()
        .unwrap()
        .iter()
        .map(|page| PageSummary {
          title: page.title.clone(),
          url: page.url.clone(),
          page_id: None,
          published: page.published,
          updated_at: None,
        })
        .collect(),
    )
  }

  async fn get_page(&self, _course_id: u64, slug: &str) -> Result<PageRecord, ApiError> {
    self.page(slug).ok_or_else(not_found)
  }

  async fn update_page(&self, _course_id: u64, slug: &str, page: &PageWrite) -> Result<(), ApiError> {
    self.record(Call::UpdatePage {
      slug: slug.to_string(),
      title: page.title.clone(),
      body: page.body.clone(),
    });
    if self.failing_pages.contains(slug) {
      return Err(server_error());
    }

    let mut pages = self.pages.lock().unwrap();
    let existing = pages.iter_mut().find(|p| p.url == slug).ok_or_else(not_found)?;
    existing.title = page.title.clone();
    existing.body = Some(page.body.clone());
    existing.published = Some(page.published);
    Ok(())
  }

  async fn create_page(&self, _course_id: u64, page: &PageWrite) -> Result<(), ApiError> {
    self.record(Call::CreatePage {
      title: page.title.clone(),
      body: page.body.clone(),
    });

    self.pages.lock().unwrap().push(PageRecord {
      title: page.title.clone(),
      url: slugify(&page.title),
      body: Some(page.body.clone()),
      published: Some(page.published),
    });
    Ok(())
  }

  async fn list_assignment_groups(&self, _course_id: u64) -> Result<Vec<AssignmentGroup>, ApiError> {
    Ok(self.groups.clone())
  }

  async fn list_assignments(&self, _course_id: u64, group_id: u64) -> Result<Vec<Assignment>, ApiError> {
    self.assignments.get(&group_id).cloned().ok_or_else(not_found)
  }

  async fn get_assignment(&self, _course_id: u64, assignment_id: u64) -> Result<Value, ApiError> {
    self.record(Call::GetAssignment { assignment_id });
    let assignment = self.find_assignment(assignment_id).ok_or_else(not_found)?;
    Ok(serde_json::to_value(assignment)?)
  }

  async fn update_assignment_position(
    &self,
    _course_id: u64,
    assignment_id: u64,
    position: usize,
  ) -> Result<(), ApiError> {
    self.record(Call::SetPosition {
      assignment_id,
      position,
    });
    if self.failing_assignments.contains(&assignment_id) {
      return Err(server_error());
    }
    self.find_assignment(assignment_id).map(|_| ()).ok_or_else(not_found)
  }
}
