//! Request/response types and the [`Transport`] trait.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::ApiError;

/// HTTP verbs used by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Put,
  Post,
}

impl std::fmt::Display for Method {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let verb = match self {
      Self::Get => "GET",
      Self::Put => "PUT",
      Self::Post => "POST",
    };
    f.write_str(verb)
  }
}

/// A single outgoing API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub url: String,
  /// Bearer token attached as `Authorization: Bearer <token>`.
  pub bearer: Option<String>,
  /// JSON body for `PUT`/`POST`.
  pub body: Option<serde_json::Value>,
}

impl ApiRequest {
  pub fn get(url: impl Into<String>) -> Self {
    Self {
      method: Method::Get,
      url: url.into(),
      bearer: None,
      body: None,
    }
  }

  pub fn put(url: impl Into<String>, body: serde_json::Value) -> Self {
    Self {
      method: Method::Put,
      url: url.into(),
      bearer: None,
      body: Some(body),
    }
  }

  pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
    Self {
      method: Method::Post,
      url: url.into(),
      bearer: None,
      body: Some(body),
    }
  }

  /// Attach a bearer token to the request.
  pub fn bearer(mut self, token: Option<&str>) -> Self {
    self.bearer = token.map(str::to_string);
    self
  }
}

/// The parts of an HTTP response the toolkit cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status: u16,
  /// Raw value of the `Link` header, if the server sent one.
  pub link: Option<String>,
  pub body: String,
}

impl ApiResponse {
  /// Whether the status is in the 2xx range.
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Turn a non-2xx response into [`ApiError::Status`].
  pub fn error_for_status(self) -> Result<Self, ApiError> {
    if self.is_success() {
      Ok(self)
    } else {
      Err(ApiError::Status {
        status: self.status,
        body: self.body,
      })
    }
  }

  /// Deserialize the body as JSON.
  pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
    Ok(serde_json::from_str(&self.body)?)
  }
}

/// Sends API requests. Implemented over `reqwest` for real runs and by
/// scripted fakes in tests.
#[async_trait]
pub trait Transport: Send + Sync {
  /// Send one request and return the response, whatever its status.
  ///
  /// # Errors
  /// Returns [`ApiError::Transport`] when no response was received at all.
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  /// Create a transport.
  ///
  /// # Arguments
  /// * `timeout_secs` - Request timeout in seconds
  /// * `skip_verify` - Disable TLS certificate verification for every request
  ///
  /// # Errors
  /// Returns an error if the underlying `reqwest::Client` cannot be built.
  pub fn new(timeout_secs: u64, skip_verify: bool) -> Result<Self> {
    Ok(Self {
      client: build_http_client(timeout_secs, skip_verify)?,
    })
  }

  /// Access the underlying client (used by the OAuth token exchange, which
  /// posts form bodies rather than JSON).
  pub fn client(&self) -> &reqwest::Client {
    &self.client
  }
}

/// Build the HTTP client used for every call in a run.
pub(crate) fn build_http_client(timeout_secs: u64, skip_verify: bool) -> Result<reqwest::Client> {
  reqwest::Client::builder()
    .timeout(Duration::from_secs(timeout_secs))
    .user_agent(format!(
      "coursekit/{} ({})",
      env!("CARGO_PKG_VERSION"),
      env!("TARGET")
    ))
    .danger_accept_invalid_certs(skip_verify)
    .build()
    .context("Failed to create HTTP client")
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
    debug!("{} {}", request.method, request.url);

    let mut builder = match request.method {
      Method::Get => self.client.get(&request.url),
      Method::Put => self.client.put(&request.url),
      Method::Post => self.client.post(&request.url),
    }
    .header(ACCEPT, "application/json");

    if let Some(token) = &request.bearer {
      builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let link = response
      .headers()
      .get(LINK)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);
    let body = response.text().await?;

    trace!(status, bytes = body.len(), "response received");

    Ok(ApiResponse { status, link, body })
  }
}


#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn success_range_is_2xx() {
    let response = |status| ApiResponse {
      status,
      link: None,
      body: String::new(),
    };
    assert!(response(200).is_success());
    assert!(response(201).is_success());
    assert!(response(204).is_success());
    assert!(!response(301).is_success());
    assert!(!response(401).is_success());
    assert!(!response(500).is_success());
  }

  #[test]
  fn error_for_status_keeps_body() {
    let response = ApiResponse {
      status: 403,
      link: None,
      body: "forbidden".to_string(),
    };
    let err = response.error_for_status().unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("forbidden"));
  }

  #[test]
  fn request_builders_set_method_and_body() {
    let request = ApiRequest::put("https://example.com/x", json!({"a": 1})).bearer(Some("tok"));
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.bearer.as_deref(), Some("tok"));
    assert_eq!(request.body, Some(json!({"a": 1})));

    let get = ApiRequest::get("https://example.com/y").bearer(None);
    assert_eq!(get.method, Method::Get);
    assert!(get.bearer.is_none());
    assert!(get.body.is_none());
  }

  #[test]
  fn transport_builds_with_and_without_verification() {
    assert!(ReqwestTransport::new(30, false).is_ok());
    assert!(ReqwestTransport::new(5, true).is_ok());
  }
}
