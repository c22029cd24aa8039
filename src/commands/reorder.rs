//! `coursekit reorder-assignments`: sort one assignment group alphabetically.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::artifacts;
use crate::assignments::{
  ReorderSummary, apply_positions, choose_group, confirm, fetch_metadata, group_menu_line, render_metadata,
  sort_alphabetically, write_backup,
};
use crate::canvas::{CanvasApi, CanvasClient};
use crate::cli::{Cli, DumpFormat};
use crate::color::ColorScheme;
use crate::commands::{canvas_config_or_exit, exit_with_error};
use crate::prompt::{Prompt, StdinPrompt};

/// Settings of one reorder run.
#[derive(Debug, Clone)]
pub struct ReorderOptions {
  pub output_dir: PathBuf,
  pub dump_format: DumpFormat,
  pub dry_run: bool,
  /// Timestamp used in the backup file name.
  pub stamp: String,
}

/// How a reorder run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
  NoGroups,
  EmptyGroup { group_id: u64 },
  DryRun { backup: PathBuf },
  Cancelled { backup: PathBuf },
  Applied { backup: PathBuf, summary: ReorderSummary },
}

/// Handle assignment reordering
pub(crate) async fn handle_reorder_command(
  output_dir: &Path,
  dump_format: DumpFormat,
  dry_run: bool,
  cli: &Cli,
  colors: &ColorScheme,
) {
  let config = canvas_config_or_exit(cli, colors);

  println!("{} {}", colors.progress("→"), colors.info("Reordering assignments"));
  println!("  {}: {}", colors.emphasis("Course"), colors.number(config.course_id));

  if dry_run {
    println!(
      "\n{} {}",
      colors.warning("⚠"),
      colors.warning("DRY RUN: Positions will not be changed")
    );
  }

  let client = match CanvasClient::new(&config.api_url, &config.access_token, cli.network.timeout) {
    Ok(client) => client,
    Err(e) => exit_with_error("Failed to create Canvas client", &e, colors),
  };

  let options = ReorderOptions {
    output_dir: output_dir.to_path_buf(),
    dump_format,
    dry_run,
    stamp: artifacts::timestamp(Local::now()),
  };

  match reorder_assignment_group(&client, config.course_id, &mut StdinPrompt, &options, colors).await {
    Ok(ReorderOutcome::Applied { summary, .. }) if !summary.failed.is_empty() => {
      println!(
        "\n{} {}",
        colors.warning("⚠"),
        colors.warning(format!(
          "Reordered with {} failures ({} updated)",
          summary.failed.len(),
          summary.updated
        ))
      );
    }
    Ok(ReorderOutcome::Applied { summary, .. }) => {
      println!(
        "\n{} {}",
        colors.success("✓"),
        colors.success(format!("Reordered {} assignments", summary.updated))
      );
    }
    Ok(_) => {}
    Err(e) => exit_with_error("Failed to reorder assignments", &e, colors),
  }
}

/// Run the interactive reorder workflow for `course_id`.
///
/// The backup is written before anything is changed. When the user declines,
/// the full metadata of every assignment is printed in the proposed order.
pub async fn reorder_assignment_group(
  api: &dyn CanvasApi,
  course_id: u64,
  prompt: &mut dyn Prompt,
  options: &ReorderOptions,
  colors: &ColorScheme,
) -> Result<ReorderOutcome> {
  let groups = api
    .list_assignment_groups(course_id)
    .await
    .context("Failed to list assignment groups")?;

  if groups.is_empty() {
    println!("{} {}", colors.warning("⚠"), colors.warning("No assignment groups found."));
    return Ok(ReorderOutcome::NoGroups);
  }

  println!("\n{}", colors.emphasis("Assignment groups:"));
  for (index, group) in groups.iter().enumerate() {
    println!("  {}", group_menu_line(index, group));
  }
  println!();

  let group = choose_group(&groups, prompt)?;
  println!(
    "\n{} {} {}",
    colors.info("Selected group:"),
    colors.emphasis(&group.name),
    colors.dimmed(format!("(ID: {})", group.id))
  );

  let assignments = api
    .list_assignments(course_id, group.id)
    .await
    .with_context(|| format!("Failed to list assignments of group {}", group.id))?;

  if assignments.is_empty() {
    println!(
      "{} {}",
      colors.warning("⚠"),
      colors.warning("No assignments found in this group.")
    );
    return Ok(ReorderOutcome::EmptyGroup { group_id: group.id });
  }

  let backup = write_backup(&options.output_dir, group, &assignments, &options.stamp).await?;
  println!("{} {}", colors.info("Backup saved to:"), colors.path(backup.display()));

  let sorted = sort_alphabetically(&assignments);
  println!("\n{}", colors.emphasis("Sorted assignment order:"));
  for (rank, assignment) in sorted.iter().enumerate() {
    println!(
      "  {}. {} {}",
      rank + 1,
      assignment.name,
      colors.dimmed(format!("(ID: {})", assignment.id))
    );
  }
  println!();

  if options.dry_run {
    return Ok(ReorderOutcome::DryRun { backup });
  }

  if !confirm(prompt)? {
    println!("{} {}", colors.warning("✗"), colors.warning("Operation cancelled."));
    for (assignment_id, result) in fetch_metadata(api, course_id, &sorted).await {
      match result {
        Ok(metadata) => println!("{}", render_metadata(&metadata, options.dump_format)?),
        Err(err) => {
          println!(
            "{} {} {}",
            colors.error("✗"),
            colors.error(format!("Failed to fetch assignment {assignment_id}:")),
            err
          );
        }
      }
      if options.dump_format == DumpFormat::Summary {
        println!();
      }
    }
    return Ok(ReorderOutcome::Cancelled { backup });
  }

  let summary = apply_positions(api, course_id, &sorted, |position, assignment, result| match result {
    Ok(()) => println!(
      "  {} Set position {} for {}",
      colors.success("✓"),
      colors.number(position),
      assignment.name
    ),
    Err(err) => {
      println!(
        "  {} Failed to update assignment {}",
        colors.error("✗"),
        colors.number(assignment.id)
      );
      println!("    {}: {}", colors.emphasis("Error"), err);
    }
  })
  .await;

  Ok(ReorderOutcome::Applied { backup, summary })
}
