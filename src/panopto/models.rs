//! Data transfer objects returned by the Panopto REST API.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/v1/folders/{id}/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionsResponse {
  #[serde(default)]
  pub results: Vec<Session>,
}

/// A recorded video session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub urls: Option<SessionUrls>,
}

impl Session {
  /// Browser URL for watching the session, when the API returned one.
  pub fn viewer_url(&self) -> Option<&str> {
    self.urls.as_ref().and_then(|urls| urls.viewer_url.as_deref())
  }
}

/// Links attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionUrls {
  #[serde(default)]
  pub viewer_url: Option<String>,
}

/// Successful response of the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub token_type: Option<String>,
  #[serde(default)]
  pub expires_in: Option<u64>,
}
