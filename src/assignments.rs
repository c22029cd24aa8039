//! Alphabetical reordering of the assignments in one assignment group.
//!
//! The workflow is: choose a group, back up its current order, sort by
//! lower-cased name, then either apply the new positions or, when the user
//! declines, dump each assignment's metadata for inspection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::artifacts;
use crate::canvas::{Assignment, AssignmentGroup, CanvasApi};
use crate::cli::DumpFormat;
use crate::http::ApiError;
use crate::prompt::Prompt;

pub const GROUP_PROMPT: &str = "Enter the number of the group to sort alphabetically: ";
pub const CONFIRM_PROMPT: &str = "Proceed with reordering? (y/n): ";

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Menu line for a group; `index` is zero-based.
pub fn group_menu_line(index: usize, group: &AssignmentGroup) -> String {
  format!("{}. {} (ID: {})", index + 1, group.name, group.id)
}

/// Parse a 1-based menu selection into a zero-based index.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
  let selection: usize = input.trim().parse().ok()?;
  (1..=count).contains(&selection).then(|| selection - 1)
}

/// Ask until the answer names one of `groups`.
///
/// # Errors
/// Fails when `groups` is empty or input ends before a valid answer.
pub fn choose_group<'a>(groups: &'a [AssignmentGroup], prompt: &mut dyn Prompt) -> Result<&'a AssignmentGroup> {
  if groups.is_empty() {
    bail!("No assignment groups to choose from");
  }

  let mut message = GROUP_PROMPT.to_string();
  loop {
    let Some(answer) = prompt.ask(&message)? else {
      bail!("Input ended before an assignment group was chosen");
    };

    if let Some(index) = parse_selection(&answer, groups.len()) {
      return Ok(&groups[index]);
    }

    message = format!(
      "Invalid selection '{}'. Enter a number from 1 to {}: ",
      answer.trim(),
      groups.len()
    );
  }
}

/// Backup file contents: the group and its assignments in their current order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBackup {
  pub group_id: u64,
  pub group_name: String,
  pub assignments: Vec<BackupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEntry {
  pub id: u64,
  pub name: String,
}

impl GroupBackup {
  pub fn new(group: &AssignmentGroup, assignments: &[Assignment]) -> Self {
    Self {
      group_id: group.id,
      group_name: group.name.clone(),
      assignments: assignments
        .iter()
        .map(|a| BackupEntry {
          id: a.id,
          name: a.name.clone(),
        })
        .collect(),
    }
  }
}

/// Write the pre-mutation backup of `group` into `dir`.
///
/// # Returns
/// Path of the backup file.
pub async fn write_backup(
  dir: &Path,
  group: &AssignmentGroup,
  assignments: &[Assignment],
  stamp: &str,
) -> Result<PathBuf> {
  let backup = GroupBackup::new(group, assignments);
  let contents = serde_json::to_string_pretty(&backup).context("Failed to serialize assignment backup")?;
  let file_name = artifacts::assignment_backup_file_name(group.id, stamp);
  artifacts::write_artifact(dir, &file_name, &contents).await
}

/// Sort by lower-cased name. Equal keys keep their fetched order.
pub fn sort_alphabetically(assignments: &[Assignment]) -> Vec<Assignment> {
  let mut sorted = assignments.to_vec();
  sorted.sort_by_cached_key(|a| a.name.to_lowercase());
  sorted
}

/// Only `y` (any case, surrounding whitespace ignored) confirms.
pub fn is_confirmation(answer: &str) -> bool {
  answer.trim().eq_ignore_ascii_case("y")
}

/// Ask for confirmation; end of input counts as a refusal.
pub fn confirm(prompt: &mut dyn Prompt) -> Result<bool> {
  Ok(prompt.ask(CONFIRM_PROMPT)?.as_deref().is_some_and(is_confirmation))
}

/// Result of applying positions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReorderSummary {
  pub updated: usize,
  /// Ids of the assignments whose position could not be set.
  pub failed: Vec<u64>,
}

/// Set positions `1..=n` following the order of `sorted`.
///
/// A failed update is recorded and the remaining assignments are still
/// processed. `on_result` receives the position, the assignment and the
/// outcome of each request.
pub async fn apply_positions<F>(
  api: &dyn CanvasApi,
  course_id: u64,
  sorted: &[Assignment],
  mut on_result: F,
) -> ReorderSummary
where
  F: FnMut(usize, &Assignment, &Result<(), ApiError>),
{
  let mut summary = ReorderSummary::default();

  for (rank, assignment) in sorted.iter().enumerate() {
    let position = rank + 1;
    let result = api
      .update_assignment_position(course_id, assignment.id, position)
      .await;

    match &result {
      Ok(()) => {
        info!(assignment = assignment.id, position, "position updated");
        summary.updated += 1;
      }
      Err(err) => {
        warn!(assignment = assignment.id, position, "failed to update position: {err}");
        summary.failed.push(assignment.id);
      }
    }
    on_result(position, assignment, &result);
  }

  summary
}

/// Fetch the full metadata of each assignment in order.
///
/// Failed fetches are returned alongside the successes rather than aborting.
pub async fn fetch_metadata(
  api: &dyn CanvasApi,
  course_id: u64,
  sorted: &[Assignment],
) -> Vec<(u64, Result<Value, ApiError>)> {
  let mut records = Vec::with_capacity(sorted.len());
  for assignment in sorted {
    records.push((assignment.id, api.get_assignment(course_id, assignment.id).await));
  }
  records
}

/// Render one assignment's metadata for the cancelled-run dump.
pub fn render_metadata(metadata: &Value, format: DumpFormat) -> Result<String> {
  match format {
    DumpFormat::Json => serde_json::to_string_pretty(metadata).context("Failed to serialize assignment metadata"),
    DumpFormat::Summary => Ok(render_summary(metadata)),
  }
}

fn render_summary(metadata: &Value) -> String {
  let field = |key: &str| match metadata.get(key) {
    None | Some(Value::Null) => "N/A".to_string(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  };

  let submission_types = metadata
    .get("submission_types")
    .and_then(Value::as_array)
    .map(|types| {
      types
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    })
    .unwrap_or_default();

  let published = metadata.get("published").and_then(Value::as_bool).unwrap_or(false);

  let description = metadata
    .get("description")
    .and_then(Value::as_str)
    .unwrap_or("")
    .trim();
  let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();

  let lines = [
    format!("ID:               {}", field("id")),
    format!("Name:             {}", field("name")),
    format!("Points Possible:  {}", field("points_possible")),
    format!("Due Date:         {}", field("due_at")),
    format!("Unlock At:        {}", field("unlock_at")),
    format!("Lock At:          {}", field("lock_at")),
    format!("Submission Types: {submission_types}"),
    format!("Grading Type:     {}", field("grading_type")),
    format!("Published:        {}", if published { "Yes" } else { "No" }),
    format!("Description:      {preview}..."),
  ];
  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use serde_json::json;

  use super::*;
  use crate::canvas::CanvasClient;
  use crate::http::transport::fake::ScriptedTransport;
  use crate::prompt::ScriptedPrompt;

  fn group(id: u64, name: &str) -> AssignmentGroup {
    AssignmentGroup {
      id,
      name: name.to_string(),
      position: None,
      group_weight: None,
    }
  }

  fn assignment(id: u64, name: &str) -> Assignment {
    serde_json::from_value(json!({"id": id, "name": name})).unwrap()
  }

  #[test]
  fn menu_lines_are_one_based() {
    assert_eq!(group_menu_line(0, &group(81, "Homework")), "1. Homework (ID: 81)");
  }

  #[test]
  fn selection_parsing() {
    assert_eq!(parse_selection("2", 3), Some(1));
    assert_eq!(parse_selection(" 3 \n", 3), Some(2));
    assert_eq!(parse_selection("0", 3), None);
    assert_eq!(parse_selection("4", 3), None);
    assert_eq!(parse_selection("-1", 3), None);
    assert_eq!(parse_selection("abc", 3), None);
    assert_eq!(parse_selection("", 3), None);
  }

  #[test]
  fn choose_group_reprompts_until_valid() {
    let groups = vec![group(1, "Homework"), group(2, "Quizzes")];
    let mut prompt = ScriptedPrompt::new(["abc", "0", "9", "2"]);

    let chosen = choose_group(&groups, &mut prompt).unwrap();

    assert_eq!(chosen.id, 2);
    assert_eq!(prompt.asked().len(), 4);
    assert_eq!(prompt.asked()[0], GROUP_PROMPT);
    assert!(prompt.asked()[1].starts_with("Invalid selection 'abc'"));
  }

  #[test]
  fn choose_group_fails_on_end_of_input() {
    let groups = vec![group(1, "Homework")];
    let mut prompt = ScriptedPrompt::new(["x"]);

    let err = choose_group(&groups, &mut prompt).unwrap_err();

    assert!(err.to_string().contains("Input ended"));
  }

  #[test]
  fn sort_is_case_insensitive_and_stable() {
    let assignments = vec![
      assignment(1, "banana"),
      assignment(2, "Apple"),
      assignment(3, "cherry"),
      assignment(4, "apple"),
    ];

    let ids: Vec<u64> = sort_alphabetically(&assignments).iter().map(|a| a.id).collect();

    assert_eq!(ids, vec![2, 4, 1, 3]);
  }

  #[test]
  fn only_y_confirms() {
    assert!(is_confirmation("y"));
    assert!(is_confirmation(" Y \n"));
    assert!(!is_confirmation("yes"));
    assert!(!is_confirmation("n"));
    assert!(!is_confirmation(""));

    assert!(!confirm(&mut ScriptedPrompt::new(Vec::<String>::new())).unwrap());
    assert!(confirm(&mut ScriptedPrompt::new(["y"])).unwrap());
  }

  #[tokio::test]
  async fn backup_records_current_order() {
    let temp = tempfile::tempdir().unwrap();
    let assignments = vec![assignment(10, "Zeta"), assignment(11, "Alpha")];

    let path = write_backup(temp.path(), &group(81, "Homework"), &assignments, "20250101_120000")
      .await
      .unwrap();

    assert_eq!(
      path.file_name().unwrap().to_str().unwrap(),
      "backup_assignment_group_81_20250101_120000.json"
    );
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
      written,
      json!({
        "group_id": 81,
        "group_name": "Homework",
        "assignments": [{"id": 10, "name": "Zeta"}, {"id": 11, "name": "Alpha"}]
      })
    );
  }

  #[test]
  fn summary_rendering() {
    let metadata = json!({
      "id": 5,
      "name": "Essay",
      "points_possible": 10.0,
      "due_at": null,
      "submission_types": ["online_upload", "online_text_entry"],
      "grading_type": "points",
      "published": true,
      "description": format!("  <p>{}</p>", "x".repeat(200)),
    });

    let rendered = render_metadata(&metadata, DumpFormat::Summary).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "ID:               5");
    assert_eq!(lines[2], "Points Possible:  10.0");
    assert_eq!(lines[3], "Due Date:         N/A");
    assert_eq!(lines[5], "Lock At:          N/A");
    assert_eq!(lines[6], "Submission Types: online_upload, online_text_entry");
    assert_eq!(lines[8], "Published:        Yes");
    assert_eq!(lines[9], format!("Description:      <p>{}...", "x".repeat(97)));
  }

  #[test]
  fn json_rendering_is_pretty() {
    let rendered = render_metadata(&json!({"name": "Essay", "id": 5}), DumpFormat::Json).unwrap();
    assert_eq!(rendered, "{\n  \"id\": 5,\n  \"name\": \"Essay\"\n}");
  }

  #[tokio::test]
  async fn metadata_fetch_continues_past_a_failure() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
      .respond(200, r#"{"id": 12, "name": "Apple"}"#)
      .respond(500, "down")
      .respond(200, r#"{"id": 13, "name": "cherry"}"#);
    let api = CanvasClient::with_transport("https://canvas.example.edu/api/v1", "t", transport.clone());
    let sorted = vec![assignment(12, "Apple"), assignment(11, "banana"), assignment(13, "cherry")];

    let records = fetch_metadata(&api, 7, &sorted).await;

    let ids: Vec<u64> = records.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![12, 11, 13]);
    assert_eq!(records[0].1.as_ref().unwrap()["name"], "Apple");
    assert_eq!(records[1].1.as_ref().unwrap_err().status(), Some(500));
    assert_eq!(records[2].1.as_ref().unwrap()["name"], "cherry");
    assert_eq!(transport.requests().len(), 3);
    assert!(transport.requests()[1].url.ends_with("/courses/7/assignments/11"));
  }
}
