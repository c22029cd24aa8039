//! Bearer-token session with one-shot re-authorization.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::warn;

use super::oauth::TokenProvider;
use crate::http::{ApiError, ApiRequest, ApiResponse, Transport};

/// Whether the session currently holds a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
  Unauthenticated,
  Authenticated,
}

/// Attaches the current bearer token to every request and re-authorizes when
/// the server reports the token as invalid.
pub struct AuthorizedSession {
  transport: Arc<dyn Transport>,
  provider: Arc<dyn TokenProvider>,
  token: Option<String>,
  authorizations: usize,
}

impl AuthorizedSession {
  pub fn new(transport: Arc<dyn Transport>, provider: Arc<dyn TokenProvider>) -> Self {
    Self {
      transport,
      provider,
      token: None,
      authorizations: 0,
    }
  }

  pub fn state(&self) -> AuthState {
    if self.token.is_some() {
      AuthState::Authenticated
    } else {
      AuthState::Unauthenticated
    }
  }

  /// Number of grants performed so far.
  pub fn authorizations(&self) -> usize {
    self.authorizations
  }

  /// Run a fresh grant and install the token for all subsequent requests.
  ///
  /// # Errors
  /// Propagates the provider's failure; the session stays unauthenticated.
  pub async fn authorize(&mut self) -> Result<()> {
    self.token = None;
    let token = self
      .provider
      .get_access_token_authorization_code_grant()
      .await
      .context("OAuth2 authorization failed")?;
    self.token = Some(token);
    self.authorizations += 1;
    Ok(())
  }

  /// Classify a response for the re-authorization logic.
  ///
  /// # Returns
  /// `false` for 2xx, `true` for 401.
  ///
  /// # Errors
  /// Any other status is returned as [`ApiError::Status`].
  pub fn is_unauthorized(response: &ApiResponse) -> Result<bool, ApiError> {
    if response.is_success() {
      return Ok(false);
    }
    if response.status == 401 {
      return Ok(true);
    }
    Err(ApiError::Status {
      status: response.status,
      body: response.body.clone(),
    })
  }

  /// `GET` a URL with the session token.
  ///
  /// Authorizes first when no token is held. A 401 triggers exactly one
  /// re-authorization followed by one retry; a second 401 is fatal.
  pub async fn get(&mut self, url: &str) -> Result<ApiResponse> {
    if self.token.is_none() {
      self.authorize().await?;
    }

    let response = self.send_get(url).await?;
    if !Self::is_unauthorized(&response)? {
      return Ok(response);
    }

    warn!("Unauthorized. Access token is invalid; re-authorization required");
    self.authorize().await?;

    let retry = self.send_get(url).await?;
    if Self::is_unauthorized(&retry)? {
      self.token = None;
      bail!("Still unauthorized after re-authorization: {url}");
    }
    Ok(retry)
  }

  async fn send_get(&self, url: &str) -> Result<ApiResponse> {
    let request = ApiRequest::get(url).bearer(self.token.as_deref());
    Ok(self.transport.send(request).await?)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;

  use super::*;
  use crate::http::transport::fake::ScriptedTransport;

  /// Hands out `token-1`, `token-2`, ... and counts grants.
  #[derive(Default)]
  pub(crate) struct CountingProvider {
    pub(crate) grants: AtomicUsize,
  }

  #[async_trait]
  impl TokenProvider for CountingProvider {
    async fn get_access_token_authorization_code_grant(&self) -> Result<String> {
      let n = self.grants.fetch_add(1, Ordering::SeqCst) + 1;
      Ok(format!("token-{n}"))
    }
  }

  struct RejectingProvider;

  #[async_trait]
  impl TokenProvider for RejectingProvider {
    async fn get_access_token_authorization_code_grant(&self) -> Result<String> {
      bail!("invalid_client")
    }
  }

  fn response(status: u16) -> ApiResponse {
    ApiResponse {
      status,
      link: None,
      body: "{}".to_string(),
    }
  }

  #[test]
  fn classification_by_status() {
    assert!(!AuthorizedSession::is_unauthorized(&response(200)).unwrap());
    assert!(AuthorizedSession::is_unauthorized(&response(401)).unwrap());
    let err = AuthorizedSession::is_unauthorized(&response(500)).unwrap_err();
    assert_eq!(err.status(), Some(500));
  }

  #[tokio::test]
  async fn first_request_authorizes_and_sends_bearer() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(200, "{}");
    let provider = Arc::new(CountingProvider::default());
    let mut session = AuthorizedSession::new(transport.clone(), provider.clone());
    assert_eq!(session.state(), AuthState::Unauthenticated);

    session.get("https://video.example.edu/Panopto/api/v1/x").await.unwrap();

    assert_eq!(session.state(), AuthState::Authenticated);
    assert_eq!(session.authorizations(), 1);
    assert_eq!(transport.requests()[0].bearer.as_deref(), Some("token-1"));
  }

  #[tokio::test]
  async fn unauthorized_triggers_exactly_one_reauthorization() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(401, "").respond(200, r#"{"Results": []}"#);
    let provider = Arc::new(CountingProvider::default());
    let mut session = AuthorizedSession::new(transport.clone(), provider.clone());

    let response = session.get("https://video.example.edu/x").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(provider.grants.load(Ordering::SeqCst), 2);
    let bearers: Vec<Option<String>> = transport.requests().into_iter().map(|r| r.bearer).collect();
    assert_eq!(bearers, vec![Some("token-1".to_string()), Some("token-2".to_string())]);
  }

  #[tokio::test]
  async fn server_error_does_not_reauthorize() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(500, "boom");
    let provider = Arc::new(CountingProvider::default());
    let mut session = AuthorizedSession::new(transport.clone(), provider.clone());

    let err = session.get("https://video.example.edu/x").await.unwrap_err();

    assert!(err.to_string().contains("500"));
    assert_eq!(provider.grants.load(Ordering::SeqCst), 1);
    assert_eq!(transport.requests().len(), 1);
  }

  #[tokio::test]
  async fn repeated_unauthorized_is_fatal() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.respond(401, "").respond(401, "");
    let provider = Arc::new(CountingProvider::default());
    let mut session = AuthorizedSession::new(transport.clone(), provider.clone());

    let err = session.get("https://video.example.edu/x").await.unwrap_err();

    assert!(err.to_string().contains("Still unauthorized"));
    assert_eq!(provider.grants.load(Ordering::SeqCst), 2);
    assert_eq!(session.state(), AuthState::Unauthenticated);
  }

  #[tokio::test]
  async fn grant_failure_leaves_session_unauthenticated() {
    let transport = Arc::new(ScriptedTransport::new());
    let mut session = AuthorizedSession::new(transport.clone(), Arc::new(RejectingProvider));

    let err = session.authorize().await.unwrap_err();

    assert!(format!("{err:#}").contains("invalid_client"));
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(transport.requests().is_empty());
  }
}
