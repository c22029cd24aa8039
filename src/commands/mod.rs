//! CLI subcommand handlers.
//!
//! Each handler prints progress with the shared [`ColorScheme`], exits with
//! status 4 on missing configuration and status 1 on runtime failure. The
//! workflows behind them take a [`CanvasApi`](crate::canvas::CanvasApi) and a
//! [`Prompt`](crate::prompt::Prompt) so they can run against fakes.

use std::process;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::config::{CanvasConfig, PanoptoConfig};

pub mod completions;
pub mod merge;
pub mod reorder;
pub mod restore;
pub mod sessions;
pub mod version;

/// Resolve the Canvas settings or exit with the invalid-configuration code.
pub(crate) fn canvas_config_or_exit(cli: &Cli, colors: &ColorScheme) -> CanvasConfig {
  match CanvasConfig::from_options(&cli.canvas) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{} {}", colors.error("Error:"), e);
      process::exit(4);
    }
  }
}

/// Resolve the Panopto settings or exit with the invalid-configuration code.
pub(crate) fn panopto_config_or_exit(cli: &Cli, colors: &ColorScheme) -> PanoptoConfig {
  match PanoptoConfig::from_options(&cli.panopto) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{} {}", colors.error("Error:"), e);
      process::exit(4);
    }
  }
}

/// Print a failure with its full context chain and exit with status 1.
pub(crate) fn exit_with_error(summary: &str, error: &anyhow::Error, colors: &ColorScheme) -> ! {
  eprintln!("{} {}", colors.error("✗"), colors.error(summary));
  eprintln!("  {}: {:#}", colors.emphasis("Error"), error);
  process::exit(1);
}
