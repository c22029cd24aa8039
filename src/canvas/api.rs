//! Trait definitions for interacting with Canvas.

use async_trait::async_trait;

use super::models::{Assignment, AssignmentGroup, PageRecord, PageSummary, PageWrite};
use crate::http::ApiError;

/// Canvas course operations used by the toolkit (enables testing with fake
/// implementations).
#[async_trait]
pub trait CanvasApi: Send + Sync {
  /// List every wiki page of a course, following pagination.
  async fn list_pages(&self, course_id: u64) -> Result<Vec<PageSummary>, ApiError>;

  /// Fetch one wiki page, including its HTML body.
  ///
  /// # Arguments
  /// * `course_id` - Course owning the page.
  /// * `slug` - The page's URL slug as reported by the listing.
  async fn get_page(&self, course_id: u64, slug: &str) -> Result<PageRecord, ApiError>;

  /// Update the page addressed by `slug`.
  ///
  /// # Errors
  /// A missing page surfaces as [`ApiError::Status`] with status 404, which
  /// callers use to fall back to [`CanvasApi::create_page`].
  async fn update_page(&self, course_id: u64, slug: &str, page: &PageWrite) -> Result<(), ApiError>;

  /// Create a new wiki page.
  async fn create_page(&self, course_id: u64, page: &PageWrite) -> Result<(), ApiError>;

  /// List the assignment groups of a course, following pagination.
  async fn list_assignment_groups(&self, course_id: u64) -> Result<Vec<AssignmentGroup>, ApiError>;

  /// List the assignments of one group, following pagination.
  async fn list_assignments(&self, course_id: u64, group_id: u64) -> Result<Vec<Assignment>, ApiError>;

  /// Fetch the full, untyped metadata record of one assignment.
  async fn get_assignment(&self, course_id: u64, assignment_id: u64) -> Result<serde_json::Value, ApiError>;

  /// Set an assignment's position within its group.
  async fn update_assignment_position(&self, course_id: u64, assignment_id: u64, position: usize)
  -> Result<(), ApiError>;
}
