//! `coursekit merge-pages`: fetch every wiki page and write one merged HTML
//! document.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::artifacts;
use crate::canvas::{CanvasApi, CanvasClient};
use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{canvas_config_or_exit, exit_with_error};
use crate::pages::{fetch_course_pages, render_merged_document};

/// Where a merge ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
  /// The course has no wiki pages; nothing was written.
  NoPages,
  Written { path: PathBuf, pages: usize },
}

/// Handle wiki page merging
pub(crate) async fn handle_merge_command(output_dir: &Path, cli: &Cli, colors: &ColorScheme) {
  let config = canvas_config_or_exit(cli, colors);

  println!("{} {}", colors.progress("→"), colors.info("Merging course wiki pages"));
  println!("  {}: {}", colors.emphasis("Course"), colors.number(config.course_id));
  println!("  {}: {}", colors.emphasis("Output"), colors.path(output_dir.display()));

  let client = match CanvasClient::new(&config.api_url, &config.access_token, cli.network.timeout) {
    Ok(client) => client,
    Err(e) => exit_with_error("Failed to create Canvas client", &e, colors),
  };

  let stamp = artifacts::timestamp(Local::now());
  match merge_course_pages(&client, config.course_id, output_dir, &stamp).await {
    Ok(MergeOutcome::NoPages) => {
      println!("\n{} {}", colors.warning("⚠"), colors.warning("No pages found."));
    }
    Ok(MergeOutcome::Written { path, pages }) => {
      println!(
        "\n{} {} {}",
        colors.success("✓"),
        colors.success(format!("Merged {pages} pages into")),
        colors.path(path.display())
      );
    }
    Err(e) => exit_with_error("Failed to merge pages", &e, colors),
  }
}

/// Fetch all pages of `course_id` and write the merged document into
/// `output_dir` under a name derived from `stamp`.
pub async fn merge_course_pages(
  api: &dyn CanvasApi,
  course_id: u64,
  output_dir: &Path,
  stamp: &str,
) -> Result<MergeOutcome> {
  let pages = fetch_course_pages(api, course_id).await?;
  if pages.is_empty() {
    return Ok(MergeOutcome::NoPages);
  }

  let document = render_merged_document(&pages);
  let file_name = artifacts::merged_pages_file_name(stamp);
  let path = artifacts::write_artifact(output_dir, &file_name, &document).await?;

  Ok(MergeOutcome::Written {
    path,
    pages: pages.len(),
  })
}
