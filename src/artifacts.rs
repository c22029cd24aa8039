//! Timestamped output files written to the working (or `--output-dir`)
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tokio::fs;

/// `YYYYmmdd_HHMMSS` stamp used in artifact file names.
pub fn timestamp(now: DateTime<Local>) -> String {
  now.format("%Y%m%d_%H%M%S").to_string()
}

/// File name of a merged wiki-page document.
pub fn merged_pages_file_name(stamp: &str) -> String {
  format!("merged_canvas_pages_{stamp}.html")
}

/// File name of an assignment-group backup.
pub fn assignment_backup_file_name(group_id: u64, stamp: &str) -> String {
  format!("backup_assignment_group_{group_id}_{stamp}.json")
}

/// Write `contents` to `dir/file_name`, creating `dir` when needed.
///
/// # Returns
/// The path of the written file.
pub async fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
  fs::create_dir_all(dir)
    .await
    .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

  let path = dir.join(file_name);
  fs::write(&path, contents)
    .await
    .with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(path)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn names_embed_the_stamp() {
    let now = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
    let stamp = timestamp(now);

    assert_eq!(stamp, "20250309_070501");
    assert_eq!(merged_pages_file_name(&stamp), "merged_canvas_pages_20250309_070501.html");
    assert_eq!(
      assignment_backup_file_name(81, &stamp),
      "backup_assignment_group_81_20250309_070501.json"
    );
  }

  #[tokio::test]
  async fn write_artifact_creates_missing_directories() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("nested").join("out");

    let path = write_artifact(&dir, "a.txt", "hello").await.unwrap();

    assert_eq!(path, dir.join("a.txt"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
  }
}
