//! Typed errors for HTTP calls.
//!
//! Most of the crate works with `anyhow`, but callers of the HTTP layer need
//! to branch on specific outcomes (a 404 during upsert, a 401 during
//! re-authorization), so the transport returns this enum instead.

use std::fmt;

/// Errors that can occur while talking to a remote API.
#[derive(Debug)]
pub enum ApiError {
  /// The request never produced a response (DNS, TLS, timeout, ...).
  Transport(reqwest::Error),
  /// The server answered with a non-success status code.
  Status {
    /// Numeric HTTP status.
    status: u16,
    /// Raw response body, kept for diagnostics.
    body: String,
  },
  /// The response body was not the JSON shape we expected.
  Decode(serde_json::Error),
  /// A URL could not be parsed or resolved.
  InvalidUrl(String),
}

impl ApiError {
  /// HTTP status carried by the error, if any.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Whether the server reported that the addressed resource does not exist.
  pub fn is_not_found(&self) -> bool {
    self.status() == Some(404)
  }

  /// Whether the server rejected the credentials.
  pub fn is_unauthorized(&self) -> bool {
    self.status() == Some(401)
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Transport(err) => write!(f, "request failed: {err}"),
      Self::Status { status, body } if body.trim().is_empty() => write!(f, "API returned error {status}"),
      Self::Status { status, body } => write!(f, "API returned error {status}: {}", body.trim()),
      Self::Decode(err) => write!(f, "failed to parse API response: {err}"),
      Self::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
    }
  }
}

impl std::error::Error for ApiError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Transport(err) => Some(err),
      Self::Decode(err) => Some(err),
      _ => None,
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(err)
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(err: serde_json::Error) -> Self {
    Self::Decode(err)
  }
}
