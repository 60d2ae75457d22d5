//! Error types for the session crate.

use std::fmt;

/// Sticky failure states recorded on a session token.
///
/// Once set, the flag is never cleared by reads; only a fresh sign-in
/// (which replaces the whole token) removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTokenError {
    /// The provider rejected or never answered a refresh attempt.
    RefreshFailed,
}

impl fmt::Display for SessionTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefreshFailed => write!(f, "access token refresh failed"),
        }
    }
}

impl std::error::Error for SessionTokenError {}

/// Signal that the session can no longer produce a usable bearer credential.
///
/// Callers respond by redirecting the user to the sign-in entry point,
/// preserving the current page as the post-login target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReauthRequired;

impl fmt::Display for ReauthRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session requires re-authentication")
    }
}

impl std::error::Error for ReauthRequired {}
