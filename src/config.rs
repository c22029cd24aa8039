//! Run configuration.
//!
//! Settings come from CLI flags, environment variables, or a `.env` file in
//! the working directory (loaded before argument parsing so clap's `env`
//! fallbacks see it). They are validated once into [`CanvasConfig`] /
//! [`PanoptoConfig`] and passed explicitly to each component.

use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::cli::{CanvasOptions, PanoptoOptions};

/// Load `.env` from the working directory (or a parent) into the process
/// environment. Variables already set are not overridden.
///
/// # Returns
/// The path of the loaded file, or `None` when no `.env` file exists.
///
/// # Errors
/// Returns the dotenv error when a file exists but cannot be read or parsed.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
  match dotenvy::dotenv() {
    Ok(path) => Ok(Some(path)),
    Err(err) if err.not_found() => Ok(None),
    Err(err) => Err(err),
  }
}

/// Connection settings for the Canvas REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
  /// API root including the version segment, without trailing slash.
  pub api_url: String,
  pub access_token: String,
  pub course_id: u64,
}

impl CanvasConfig {
  /// Validate the Canvas options gathered by clap.
  ///
  /// # Errors
  /// Lists every missing setting by its environment variable name.
  pub fn from_options(options: &CanvasOptions) -> Result<Self> {
    let mut missing = Vec::new();
    if options.canvas_url.is_none() {
      missing.push("CANVAS_API_URL (--canvas-url)");
    }
    if options.canvas_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
      missing.push("CANVAS_ACCESS_TOKEN (--canvas-token)");
    }
    if options.course_id.is_none() {
      missing.push("COURSE_ID (--course-id)");
    }

    match (&options.canvas_url, &options.canvas_token, options.course_id) {
      (Some(url), Some(token), Some(course_id)) if missing.is_empty() => Ok(Self {
        api_url: url.trim_end_matches('/').to_string(),
        access_token: token.trim().to_string(),
        course_id,
      }),
      _ => bail!("Missing Canvas configuration: {}", missing.join(", ")),
    }
  }
}

/// OAuth client and server settings for the Panopto API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoptoConfig {
  /// Scheme and host of the Panopto site, without trailing slash.
  pub server_url: String,
  pub client_id: String,
  pub client_secret: String,
}

impl PanoptoConfig {
  /// Validate the Panopto options gathered by clap.
  ///
  /// # Errors
  /// Lists every missing setting by its environment variable name.
  pub fn from_options(options: &PanoptoOptions) -> Result<Self> {
    let mut missing = Vec::new();
    if options.panopto_url.is_none() {
      missing.push("PANOPTO_URL (--panopto-url)");
    }
    if options.panopto_client_id.is_none() {
      missing.push("PANOPTO_CLIENT_ID (--panopto-client-id)");
    }
    if options.panopto_client_secret.is_none() {
      missing.push("PANOPTO_CLIENT_SECRET (--panopto-client-secret)");
    }

    match (
      &options.panopto_url,
      &options.panopto_client_id,
      &options.panopto_client_secret,
    ) {
      (Some(url), Some(client_id), Some(client_secret)) => Ok(Self {
        server_url: url.trim_end_matches('/').to_string(),
        client_id: client_id.clone(),
        client_secret: client_secret.clone(),
      }),
      _ => bail!("Missing Panopto configuration: {}", missing.join(", ")),
    }
  }

  /// Root of the Panopto application (`https://<server>/Panopto`).
  pub fn app_root(&self) -> String {
    format!("{}/Panopto", self.server_url)
  }
}
