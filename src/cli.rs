//! Command-line interface definitions for coursekit.
//!
//! This module defines the CLI structure using clap derives. Connection
//! settings may come from flags, the environment, or a `.env` file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::merge::handle_merge_command;
use crate::commands::reorder::handle_reorder_command;
use crate::commands::restore::handle_restore_command;
use crate::commands::sessions::handle_sessions_command;
use crate::commands::version::handle_version_command;
use crate::config::load_dotenv;
use crate::panopto::DEFAULT_REDIRECT_PORT;

/// coursekit - Maintenance tools for Canvas courses and Panopto folders
#[derive(Debug, Parser)]
#[command(
  name = "coursekit",
  version,
  about = "Maintenance tools for Canvas courses and Panopto folders",
  long_about = "A command-line toolkit for course maintenance.\n\
                Lists Panopto folder recordings, merges and restores Canvas wiki pages,\n\
                and sorts the assignments of a Canvas assignment group.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Canvas connection options
  #[command(flatten)]
  pub canvas: CanvasOptions,

  /// Panopto connection options
  #[command(flatten)]
  pub panopto: PanoptoOptions,

  /// Network options
  #[command(flatten)]
  pub network: NetworkOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List the recordings of a Panopto folder
  Sessions {
    /// Panopto folder ID
    #[arg(long, value_name = "FOLDER_ID")]
    folder: String,

    /// Accept invalid TLS certificates from the Panopto server
    #[arg(long)]
    skip_verify: bool,

    /// Local port for the OAuth redirect listener
    #[arg(long, default_value_t = DEFAULT_REDIRECT_PORT, value_name = "PORT")]
    redirect_port: u16,
  },

  /// Merge every wiki page of the course into one HTML file
  MergePages {
    #[command(flatten)]
    output: OutputOptions,
  },

  /// Sort the assignments of one assignment group alphabetically
  ReorderAssignments {
    #[command(flatten)]
    output: OutputOptions,

    /// Format of the metadata dump printed when reordering is declined
    #[arg(long, value_enum, default_value = "json", value_name = "FORMAT")]
    dump_format: DumpFormat,

    /// Print the new order and write the backup without changing anything
    #[arg(long)]
    dry_run: bool,
  },

  /// Split a merged HTML file and write each page back to the course
  RestorePages {
    /// Merged HTML file (prompted for when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// List the pages and slugs without writing to Canvas
    #[arg(long)]
    dry_run: bool,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(_) => {
      // Likely a bare host; retry with https://
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  let mut url_str = parsed.to_string();
  if url_str.ends_with('/') && url_str.len() > 1 {
    url_str.pop();
  }

  Ok(url_str)
}

/// Canvas connection options
#[derive(Debug, Parser)]
pub struct CanvasOptions {
  /// Canvas API root, including the version segment
  #[arg(long, global = true, env = "CANVAS_API_URL", value_name = "URL", value_parser = normalize_url)]
  pub canvas_url: Option<String>,

  /// Canvas personal access token
  #[arg(
    long,
    global = true,
    env = "CANVAS_ACCESS_TOKEN",
    value_name = "TOKEN",
    hide_env_values = true
  )]
  pub canvas_token: Option<String>,

  /// Canvas course ID
  #[arg(long, global = true, env = "COURSE_ID", value_name = "ID")]
  pub course_id: Option<u64>,
}

/// Panopto connection options
#[derive(Debug, Parser)]
pub struct PanoptoOptions {
  /// Panopto server URL
  #[arg(long, global = true, env = "PANOPTO_URL", value_name = "URL", value_parser = normalize_url)]
  pub panopto_url: Option<String>,

  /// Panopto API client ID
  #[arg(long, global = true, env = "PANOPTO_CLIENT_ID", value_name = "ID")]
  pub panopto_client_id: Option<String>,

  /// Panopto API client secret
  #[arg(
    long,
    global = true,
    env = "PANOPTO_CLIENT_SECRET",
    value_name = "SECRET",
    hide_env_values = true
  )]
  pub panopto_client_secret: Option<String>,
}

/// Output options
#[derive(Debug, Parser)]
pub struct OutputOptions {
  /// Directory for generated files
  #[arg(short, long, default_value = ".", value_name = "DIR")]
  pub output_dir: PathBuf,
}

/// Network options
#[derive(Debug, Parser)]
pub struct NetworkOptions {
  /// Request timeout in seconds
  #[arg(long, global = true, default_value = "30", value_name = "SECONDS")]
  pub timeout: u64,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, global = true, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Rendering of assignment metadata when a reorder is declined
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
  /// Full API record as pretty JSON
  Json,
  /// Selected fields as labelled lines
  Summary,
}

impl Cli {
  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.network.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    if let Command::Sessions {
      folder, redirect_port, ..
    } = &self.command
    {
      if folder.trim().is_empty() {
        return Err("--folder must not be empty".to_string());
      }
      if *redirect_port == 0 {
        return Err("--redirect-port must be a fixed port registered with the Panopto API client".to_string());
      }
    }

    Ok(())
  }
}

/// Load `.env`, parse CLI arguments, initialize shared services, and dispatch
/// to the chosen command.
pub async fn run() {
  // Must precede parsing so clap's env fallbacks see the file's values
  let dotenv = load_dotenv();

  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  match &dotenv {
    Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
    Ok(None) => debug!("No .env file found"),
    Err(err) => warn!("Ignoring unreadable .env file: {err}"),
  }

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Sessions {
      folder,
      skip_verify,
      redirect_port,
    } => {
      handle_sessions_command(folder, *skip_verify, *redirect_port, &cli, &colors).await;
    }
    Command::MergePages { output } => {
      handle_merge_command(&output.output_dir, &cli, &colors).await;
    }
    Command::ReorderAssignments {
      output,
      dump_format,
      dry_run,
    } => {
      handle_reorder_command(&output.output_dir, *dump_format, *dry_run, &cli, &colors).await;
    }
    Command::RestorePages { file, dry_run } => {
      handle_restore_command(file.as_deref(), *dry_run, &cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
