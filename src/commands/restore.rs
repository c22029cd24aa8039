//! `coursekit restore-pages`: split a merged document and upsert each page.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::fs;

use crate::canvas::{CanvasApi, CanvasClient};
use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{canvas_config_or_exit, exit_with_error};
use crate::pages::{RestoreSummary, UpsertOutcome, WikiPage, restore_pages, split_merged_document};
use crate::prompt::{Prompt, StdinPrompt};

pub const FILE_PROMPT: &str = "Enter the path to the merged HTML file: ";

/// Result of a restore run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
  /// Pages that would be written; nothing was sent.
  DryRun(Vec<WikiPage>),
  Restored(RestoreSummary),
}

/// Handle restoring pages from a merged document
pub(crate) async fn handle_restore_command(file: Option<&Path>, dry_run: bool, cli: &Cli, colors: &ColorScheme) {
  let config = canvas_config_or_exit(cli, colors);

  let path = match resolve_input_path(file, &mut StdinPrompt) {
    Ok(path) => path,
    Err(e) => exit_with_error("No input file", &e, colors),
  };

  println!("\n{} {}", colors.progress("→"), colors.info("Restoring course wiki pages"));
  println!("  {}: {}", colors.emphasis("Course"), colors.number(config.course_id));
  println!("  {}: {}", colors.emphasis("Input"), colors.path(path.display()));

  if dry_run {
    println!(
      "\n{} {}",
      colors.warning("⚠"),
      colors.warning("DRY RUN: No pages will be written")
    );
  }

  let client = match CanvasClient::new(&config.api_url, &config.access_token, cli.network.timeout) {
    Ok(client) => client,
    Err(e) => exit_with_error("Failed to create Canvas client", &e, colors),
  };

  match restore_from_file(&client, config.course_id, &path, dry_run, colors).await {
    Ok(RestoreOutcome::DryRun(pages)) => {
      println!("\n{} {}", colors.success("✓"), colors.success(format!("{} pages found", pages.len())));
    }
    Ok(RestoreOutcome::Restored(summary)) => {
      println!(
        "\n{} Updated: {}, Created: {}, Failed: {}",
        if summary.failed.is_empty() {
          colors.success("✓")
        } else {
          colors.warning("⚠")
        },
        colors.number(summary.updated),
        colors.number(summary.created),
        colors.number(summary.failed.len())
      );
    }
    Err(e) => exit_with_error("Failed to restore pages", &e, colors),
  }
}

/// Use `file` when given, otherwise ask for a path.
///
/// # Errors
/// Fails when input ends or the answer is blank.
pub fn resolve_input_path(file: Option<&Path>, prompt: &mut dyn Prompt) -> Result<PathBuf> {
  if let Some(file) = file {
    return Ok(file.to_path_buf());
  }

  let Some(answer) = prompt.ask(FILE_PROMPT)? else {
    bail!("Input ended before a file path was given");
  };
  let answer = answer.trim();
  if answer.is_empty() {
    bail!("No file path given");
  }
  Ok(PathBuf::from(answer))
}

/// Read a merged document, split it, and write every page to `course_id`
/// unless `dry_run` is set.
///
/// # Errors
/// Fails when the file is missing or unreadable. Per-page failures are
/// reported and counted in the summary instead.
pub async fn restore_from_file(
  api: &dyn CanvasApi,
  course_id: u64,
  path: &Path,
  dry_run: bool,
  colors: &ColorScheme,
) -> Result<RestoreOutcome> {
  if !fs::try_exists(path).await.unwrap_or(false) {
    bail!("File not found: {}", path.display());
  }

  let html = fs::read_to_string(path)
    .await
    .with_context(|| format!("Failed to read {}", path.display()))?;
  let pages = split_merged_document(&html)?;

  println!(
    "\n{} {}",
    colors.info("→"),
    colors.info(format!("Found {} pages", pages.len()))
  );

  if dry_run {
    for page in &pages {
      println!("  {} {} {}", colors.emphasis(&page.title), colors.dimmed("→"), colors.code(&page.slug));
    }
    return Ok(RestoreOutcome::DryRun(pages));
  }

  let summary = restore_pages(api, course_id, &pages, |page, result| match result {
    Ok(UpsertOutcome::Updated) => {
      println!("  {} {} {}", colors.success("✓"), colors.info("Updated:"), page.title);
    }
    Ok(UpsertOutcome::Created) => {
      println!("  {} {} {}", colors.success("+"), colors.info("Created:"), page.title);
    }
    Err(err) => {
      println!("  {} {} {}", colors.error("✗"), colors.error("Failed:"), page.title);
      println!("    {}: {}", colors.emphasis("Error"), err);
    }
  })
  .await;

  Ok(RestoreOutcome::Restored(summary))
}
