//! Data transfer objects returned by the Canvas REST API.

use serde::{Deserialize, Serialize};

/// Entry of the wiki-page listing (`GET /courses/:id/pages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
  /// Human-readable title.
  pub title: String,
  /// URL slug; Canvas addresses wiki pages by this value.
  pub url: String,
  #[serde(default)]
  pub page_id: Option<u64>,
  #[serde(default)]
  pub published: Option<bool>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

/// A single wiki page including its HTML body (`GET /courses/:id/pages/:url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
  pub title: String,
  pub url: String,
  /// HTML fragment; Canvas sends `null` for pages that were never edited.
  #[serde(default)]
  pub body: Option<String>,
  #[serde(default)]
  pub published: Option<bool>,
}

/// Payload for creating or updating a wiki page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWrite {
  pub title: String,
  pub body: String,
  pub published: bool,
}

/// Assignment group metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentGroup {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub position: Option<i64>,
  #[serde(default)]
  pub group_weight: Option<f64>,
}

/// An assignment as listed within a group.
///
/// Only `position` is ever written back; the remaining fields exist for
/// display and backups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub position: Option<i64>,
  #[serde(default)]
  pub points_possible: Option<f64>,
  #[serde(default)]
  pub due_at: Option<String>,
  #[serde(default)]
  pub unlock_at: Option<String>,
  #[serde(default)]
  pub lock_at: Option<String>,
  #[serde(default)]
  pub submission_types: Vec<String>,
  #[serde(default)]
  pub grading_type: Option<String>,
  #[serde(default)]
  pub published: bool,
  #[serde(default)]
  pub description: Option<String>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn page_record_accepts_null_body() {
    let record: PageRecord = serde_json::from_value(json!({
      "title": "Empty",
      "url": "empty",
      "body": null
    }))
    .unwrap();
    assert_eq!(record.body, None);
  }

  #[test]
  fn assignment_tolerates_sparse_payloads() {
    let assignment: Assignment = serde_json::from_value(json!({"id": 5, "name": "Quiz"})).unwrap();
    assert_eq!(assignment.id, 5);
    assert!(assignment.submission_types.is_empty());
    assert!(!assignment.published);
    assert_eq!(assignment.points_possible, None);
  }
}
