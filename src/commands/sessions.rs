//! `coursekit sessions`: list the recordings of a Panopto folder.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{exit_with_error, panopto_config_or_exit};
use crate::config::PanoptoConfig;
use crate::http::ReqwestTransport;
use crate::panopto::{AuthorizedSession, FolderSessions, PanoptoClient, PanoptoOAuth2, format_session_line};

/// Handle folder session listing
pub(crate) async fn handle_sessions_command(
  folder: &str,
  skip_verify: bool,
  redirect_port: u16,
  cli: &Cli,
  colors: &ColorScheme,
) {
  let config = panopto_config_or_exit(cli, colors);

  println!("{} {}", colors.progress("→"), colors.info("Listing Panopto folder sessions"));
  println!("  {}: {}", colors.emphasis("Server"), colors.link(&config.server_url));
  println!("  {}: {}", colors.emphasis("Folder"), colors.number(folder));
  if skip_verify {
    println!(
      "  {} {}",
      colors.warning("⚠"),
      colors.warning("TLS certificate verification is disabled")
    );
  }

  let listing = match fetch_folder_sessions(&config, folder, skip_verify, redirect_port, cli.network.timeout).await {
    Ok(listing) => listing,
    Err(e) => exit_with_error("Failed to list folder sessions", &e, colors),
  };

  match serde_json::to_string_pretty(&listing.raw) {
    Ok(pretty) => println!("\n{pretty}\n"),
    Err(e) => exit_with_error("Failed to render the folder listing", &anyhow::Error::from(e), colors),
  }

  for session in &listing.sessions {
    println!("{}", format_session_line(session));
  }

  println!(
    "\n{} {}",
    colors.success("✓"),
    colors.success(format!("{} sessions", listing.sessions.len()))
  );
}

/// Authorize through the browser and fetch one folder's sessions.
async fn fetch_folder_sessions(
  config: &PanoptoConfig,
  folder: &str,
  skip_verify: bool,
  redirect_port: u16,
  timeout_secs: u64,
) -> Result<FolderSessions> {
  let provider = PanoptoOAuth2::new(config, redirect_port, timeout_secs, skip_verify)?;
  let transport = ReqwestTransport::new(timeout_secs, skip_verify)?;
  let session = AuthorizedSession::new(Arc::new(transport), Arc::new(provider));

  let mut client = PanoptoClient::new(config.app_root(), session);
  client.authorize().await?;
  client
    .folder_sessions(folder)
    .await
    .with_context(|| format!("Failed to fetch sessions of folder {folder}"))
}
