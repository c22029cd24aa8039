//! OAuth2 authorization-code grant against a Panopto site.
//!
//! The flow opens the system browser on the provider's consent page, waits
//! for the redirect on a local listener, and exchanges the returned code for
//! a bearer token. Tokens are never cached: each call performs a new grant.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, info};
use url::Url;

use super::models::TokenResponse;
use crate::config::PanoptoConfig;
use crate::http::transport::build_http_client;

/// Port of the redirect URI registered for the API client.
pub const DEFAULT_REDIRECT_PORT: u16 = 9127;

const REDIRECT_PATH: &str = "/redirect";
const SCOPE: &str = "api";
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Something that can obtain a fresh access token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
  /// Run the authorization-code grant and return the access token.
  ///
  /// # Errors
  /// Returns an error when the user denies consent, the redirect never
  /// arrives, or the token endpoint rejects the exchange.
  async fn get_access_token_authorization_code_grant(&self) -> Result<String>;
}

/// Browser-based authorization-code grant for one Panopto API client.
pub struct PanoptoOAuth2 {
  app_root: String,
  client_id: String,
  client_secret: String,
  redirect_port: u16,
  callback_timeout: Duration,
  client: reqwest::Client,
}

impl PanoptoOAuth2 {
  /// Create the grant helper.
  ///
  /// # Arguments
  /// * `config` - Panopto server and client credentials
  /// * `redirect_port` - Local port of the registered redirect URI
  /// * `timeout_secs` - Timeout for the token exchange request
  /// * `skip_verify` - Disable TLS certificate verification
  pub fn new(config: &PanoptoConfig, redirect_port: u16, timeout_secs: u64, skip_verify: bool) -> Result<Self> {
    Ok(Self {
      app_root: config.app_root(),
      client_id: config.client_id.clone(),
      client_secret: config.client_secret.clone(),
      redirect_port,
      callback_timeout: CALLBACK_TIMEOUT,
      client: build_http_client(timeout_secs, skip_verify)?,
    })
  }

  /// Redirect URI registered with the provider.
  pub fn redirect_uri(&self) -> String {
    format!("http://localhost:{}{}", self.redirect_port, REDIRECT_PATH)
  }

  /// Consent page URL the user is sent to.
  pub fn authorization_url(&self, state: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/oauth2/connect/authorize", self.app_root))
      .with_context(|| format!("Invalid Panopto URL: {}", self.app_root))?;
    url
      .query_pairs_mut()
      .append_pair("client_id", &self.client_id)
      .append_pair("response_type", "code")
      .append_pair("redirect_uri", &self.redirect_uri())
      .append_pair("scope", SCOPE)
      .append_pair("state", state);
    Ok(url)
  }

  fn token_url(&self) -> String {
    format!("{}/oauth2/connect/token", self.app_root)
  }

  /// HTTP Basic credentials for the token endpoint.
  fn client_auth_header(&self) -> String {
    let credentials = format!("{}:{}", self.client_id, self.client_secret);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
  }

  async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
    let redirect_uri = self.redirect_uri();
    let response = self
      .client
      .post(self.token_url())
      .header(AUTHORIZATION, self.client_auth_header())
      .header(ACCEPT, "application/json")
      .form(&[
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri.as_str()),
      ])
      .send()
      .await
      .context("Failed to reach the Panopto token endpoint")?;

    let status = response.status();
    if !status.is_success() {
      let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      bail!("Token exchange failed with status {status}: {error_text}");
    }

    response
      .json::<TokenResponse>()
      .await
      .context("Failed to parse the token endpoint response")
  }
}

#[async_trait]
impl TokenProvider for PanoptoOAuth2 {
  async fn get_access_token_authorization_code_grant(&self) -> Result<String> {
    let state = generate_state()?;
    let authorization_url = self.authorization_url(&state)?;

    let server = tiny_http::Server::http(("127.0.0.1", self.redirect_port))
      .map_err(|e| anyhow!("Failed to listen for the OAuth redirect on port {}: {e}", self.redirect_port))?;

    eprintln!("Opening browser to: {authorization_url}");
    if let Err(error) = open::that(authorization_url.as_str()) {
      eprintln!("Failed to open browser: {error}");
      eprintln!("Open the URL above manually, then return here.");
    }

    let timeout = self.callback_timeout;
    let code = tokio::task::spawn_blocking(move || wait_for_redirect(&server, timeout, &state))
      .await
      .context("OAuth redirect listener stopped unexpectedly")??;
    debug!("received authorization code");

    let token = self.exchange_code(&code).await?;
    info!(
      token_type = token.token_type.as_deref().unwrap_or("bearer"),
      expires_in = token.expires_in,
      "obtained access token"
    );

    Ok(token.access_token)
  }
}

/// Random hex nonce echoed back by the provider to bind the redirect to this
/// request.
fn generate_state() -> Result<String> {
  let mut bytes = [0u8; 16];
  getrandom::fill(&mut bytes).map_err(|e| anyhow!("Failed to generate OAuth state: {e}"))?;
  Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// What a request hitting the local listener means for the grant.
#[derive(Debug, PartialEq, Eq)]
enum RedirectOutcome {
  /// Not the redirect (favicon, probes); keep waiting.
  Ignore,
  /// The provider returned an authorization code.
  Code(String),
  /// The provider returned an error, or the redirect is unusable.
  Rejected(String),
}

fn classify_redirect(path_and_query: &str, expected_state: &str) -> RedirectOutcome {
  let (path, query) = path_and_query.split_once('?').unwrap_or((path_and_query, ""));
  if path != REDIRECT_PATH {
    return RedirectOutcome::Ignore;
  }

  let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();

  if let Some(error) = params.get("error") {
    let detail = params
      .get("error_description")
      .map(|d| format!(" ({d})"))
      .unwrap_or_default();
    return RedirectOutcome::Rejected(format!("authorization denied: {error}{detail}"));
  }

  if params.get("state").map(String::as_str) != Some(expected_state) {
    return RedirectOutcome::Rejected("state mismatch in OAuth redirect".to_string());
  }

  match params.get("code") {
    Some(code) if !code.is_empty() => RedirectOutcome::Code(code.clone()),
    _ => RedirectOutcome::Rejected("OAuth redirect carried no authorization code".to_string()),
  }
}

/// Block until the listener receives the redirect, answering each request.
fn wait_for_redirect(server: &tiny_http::Server, timeout: Duration, expected_state: &str) -> Result<String> {
  let deadline = Instant::now() + timeout;

  loop {
    let remaining = deadline.saturating_duration_since(Instant::now());
    let request = match server.recv_timeout(remaining) {
      Ok(Some(request)) => request,
      Ok(None) => bail!("No OAuth redirect received within {}s", timeout.as_secs()),
      Err(e) => bail!("OAuth redirect listener failed: {e}"),
    };

    match classify_redirect(request.url(), expected_state) {
      RedirectOutcome::Ignore => {
        let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
      }
      RedirectOutcome::Code(code) => {
        let _ = request.respond(html_response(
          "<html><body><h1>Authorized</h1><p>You can close this tab.</p></body></html>",
        ));
        return Ok(code);
      }
      RedirectOutcome::Rejected(reason) => {
        let _ = request.respond(html_response(
          "<html><body><h1>Authorization failed</h1><p>Check the terminal output.</p></body></html>",
        ));
        bail!(reason);
      }
    }
  }
}

fn html_response(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
  let response = tiny_http::Response::from_string(body);
  match tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
    Ok(header) => response.with_header(header),
    Err(()) => response,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn grant() -> PanoptoOAuth2 {
    let config = PanoptoConfig {
      server_url: "https://video.example.edu".to_string(),
      client_id: "client-123".to_string(),
      client_secret: "s3cret".to_string(),
    };
    PanoptoOAuth2::new(&config, DEFAULT_REDIRECT_PORT, 30, false).unwrap()
  }

  #[test]
  fn authorization_url_carries_grant_parameters() {
    let url = grant().authorization_url("abc123").unwrap();

    assert_eq!(url.path(), "/Panopto/oauth2/connect/authorize");
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-123");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://localhost:9127/redirect");
    assert_eq!(params["scope"], "api");
    assert_eq!(params["state"], "abc123");
  }

  #[test]
  fn token_url_and_client_auth() {
    let grant = grant();
    assert_eq!(grant.token_url(), "https://video.example.edu/Panopto/oauth2/connect/token");

    let header = grant.client_auth_header();
    let encoded = header.strip_prefix("Basic ").unwrap();
    let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
    assert_eq!(decoded, "client-123:s3cret");
  }

  #[test]
  fn state_is_random_hex() {
    let first = generate_state().unwrap();
    let second = generate_state().unwrap();
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first, second);
  }

  #[test]
  fn classify_redirect_extracts_code() {
    assert_eq!(
      classify_redirect("/redirect?code=xyz%2F1&state=s1", "s1"),
      RedirectOutcome::Code("xyz/1".to_string())
    );
  }

  #[test]
  fn classify_redirect_ignores_other_paths() {
    assert_eq!(classify_redirect("/favicon.ico", "s1"), RedirectOutcome::Ignore);
    assert_eq!(classify_redirect("/", "s1"), RedirectOutcome::Ignore);
  }

  #[test]
  fn classify_redirect_rejects_errors_and_bad_state() {
    assert!(matches!(
      classify_redirect("/redirect?error=access_denied&error_description=nope", "s1"),
      RedirectOutcome::Rejected(reason) if reason.contains("access_denied") && reason.contains("nope")
    ));
    assert!(matches!(
      classify_redirect("/redirect?code=abc&state=other", "s1"),
      RedirectOutcome::Rejected(reason) if reason.contains("state mismatch")
    ));
    assert!(matches!(
      classify_redirect("/redirect?state=s1", "s1"),
      RedirectOutcome::Rejected(_)
    ));
  }
}
