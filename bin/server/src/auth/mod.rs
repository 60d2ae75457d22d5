//! Authentication and session handling for the greenline server.
//!
//! This module provides:
//! - Google OAuth sign-in (authorization-code grant with PKCE and offline
//!   access)
//! - The stateless signed session cookie carrying the staff member's
//!   [`SessionToken`](greenline_session::SessionToken)
//! - Refresh-on-read middleware that keeps the access token current
//! - The `RequireSession` extractor routes use to obtain a bearer credential
//!
//! # Session Model
//!
//! There is no server-side session store: the whole credential bundle lives
//! in a signed cookie, read and (when a refresh fires) rewritten on each
//! request. Two near-expiry requests from the same user may both trigger a
//! refresh; the provider tolerates concurrent refresh grants, so the race is
//! benign and uncoordinated. A failed refresh is never retried within a
//! request — the sticky flag on the token sends the user back through
//! sign-in instead.

pub mod google;
pub mod middleware;
pub mod routes;

pub use google::GoogleAuthClient;
pub use middleware::{RequireSession, refresh_session};
pub use routes::{callback, login, logout};

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use greenline_assistant::Assistant;
use std::sync::Arc;
use time::Duration as TimeDuration;

use crate::config::{ServerConfig, SessionConfig};
use crate::relay::RelayClient;

/// Session cookie name.
pub(crate) const SESSION_COOKIE: &str = "greenline_session";

/// Auth state cookie name (CSRF protection during the OAuth flow).
pub(crate) const AUTH_STATE_COOKIE: &str = "auth_state";

/// Builds the session cookie from a serialized token.
pub(crate) fn session_cookie(value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::days(config.cookie_max_age_days))
        .build()
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Google OAuth client.
    pub google: Arc<GoogleAuthClient>,
    /// Relay client for the operations backend.
    pub relay: Arc<RelayClient>,
    /// The floating assistant.
    pub assistant: Arc<Assistant>,
    /// Key the session cookie is signed with.
    pub cookie_key: Key,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: Arc<ServerConfig>,
        google: GoogleAuthClient,
        relay: RelayClient,
        assistant: Assistant,
        cookie_key: Key,
    ) -> Self {
        Self {
            config,
            google: Arc::new(google),
            relay: Arc::new(relay),
            assistant: Arc::new(assistant),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
