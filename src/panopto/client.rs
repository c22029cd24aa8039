//! Panopto REST client for folder listings.

use anyhow::{Context, Result};

use super::models::{Session, SessionsResponse};
use super::session::AuthorizedSession;

/// Sessions of one folder, with the raw payload kept for display.
#[derive(Debug, Clone)]
pub struct FolderSessions {
  pub raw: serde_json::Value,
  pub sessions: Vec<Session>,
}

/// Panopto API client bound to one authorized session.
pub struct PanoptoClient {
  app_root: String,
  session: AuthorizedSession,
}

impl PanoptoClient {
  /// # Arguments
  /// * `app_root` - Panopto application root (e.g., https://video.example.edu/Panopto)
  /// * `session` - Session that carries and refreshes the bearer token
  pub fn new(app_root: impl Into<String>, session: AuthorizedSession) -> Self {
    Self {
      app_root: app_root.into().trim_end_matches('/').to_string(),
      session,
    }
  }

  /// Perform the initial authorization.
  pub async fn authorize(&mut self) -> Result<()> {
    self.session.authorize().await
  }

  #[cfg(test)]
  pub(crate) fn session(&self) -> &AuthorizedSession {
    &self.session
  }

  /// List the sessions stored directly in a folder.
  ///
  /// # Errors
  /// Fails on authentication failure, any non-2xx status other than a single
  /// recoverable 401, or an unparseable body.
  pub async fn folder_sessions(&mut self, folder_id: &str) -> Result<FolderSessions> {
    let url = format!("{}/api/v1/folders/{}/sessions", self.app_root, folder_id);
    let response = self.session.get(&url).await?;

    let raw: serde_json::Value =
      serde_json::from_str(&response.body).context("Failed to parse folder sessions response from Panopto API")?;
    let parsed: SessionsResponse =
      serde_json::from_value(raw.clone()).context("Unexpected folder sessions payload from Panopto API")?;

    Ok(FolderSessions {
      raw,
      sessions: parsed.results,
    })
  }
}

/// One console line per session: `<id>: <name> <viewer url>`.
pub fn format_session_line(session: &Session) -> String {
  match session.viewer_url() {
    Some(viewer) => format!("{}: {} {}", session.id, session.name, viewer),
    None => format!("{}: {}", session.id, session.name),
  }
}
