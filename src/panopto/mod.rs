//! Panopto module: OAuth2 authorization-code grant, the re-authorizing
//! session wrapper, the folder client, and data models.

pub mod client;
pub mod models;
pub mod oauth;
pub mod session;

pub use client::{FolderSessions, PanoptoClient, format_session_line};
pub use models::{Session, SessionUrls, SessionsResponse};
pub use oauth::{DEFAULT_REDIRECT_PORT, PanoptoOAuth2, TokenProvider};
pub use session::{AuthState, AuthorizedSession};
