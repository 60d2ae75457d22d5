//! Session token data model and lifecycle transitions.
//!
//! The session token bundles the provider credentials for one signed-in
//! staff member. It is created at the OAuth callback, read on every
//! authenticated request, and rewritten whenever a read crosses the refresh
//! threshold. All transitions are pure: the server decides when to call the
//! provider and feeds the outcome back in.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::claims;
use crate::error::{ReauthRequired, SessionTokenError};

/// Safety margin, in minutes, subtracted from the access-token expiry to
/// trigger proactive renewal. Refreshing ahead of actual expiry avoids races
/// with in-flight requests still using the old credential.
const REFRESH_BUFFER_MINUTES: i64 = 5;

/// Fallback access-token lifetime when the provider omits an expiry hint.
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 1;

fn default_lifetime() -> Duration {
    Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS)
}

/// Token material returned by the provider.
///
/// Produced by both the authorization-code exchange (initial sign-in) and
/// the refresh grant; refresh responses may omit the refresh and id tokens.
#[derive(Debug, Clone)]
pub struct ProviderGrant {
    /// Short-lived bearer credential for the provider's own APIs.
    pub access_token: String,
    /// Identity assertion; the bearer credential for the console backend.
    pub id_token: Option<String>,
    /// Long-lived credential used to mint new access tokens.
    pub refresh_token: Option<String>,
    /// Provider-reported access-token lifetime.
    pub expires_in: Option<Duration>,
}

/// The credential bundle for one signed-in staff member.
///
/// Serialized into the signed session cookie; field names are part of the
/// cookie format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Short-lived bearer credential for provider API calls.
    access_token: String,
    /// Identity assertion, preferred bearer for the console backend.
    id_token: String,
    /// Long-lived credential for minting new access tokens.
    refresh_token: String,
    /// When the access token becomes invalid. Always set.
    access_token_expires: DateTime<Utc>,
    /// Sticky failure flag; set once a refresh attempt fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<SessionTokenError>,
}

impl SessionToken {
    /// Creates a token from the provider's authorization-code exchange.
    ///
    /// Called only after a successful exchange, so there are no error
    /// conditions here; an absent expiry hint defaults to one hour.
    #[must_use]
    pub fn from_initial_grant(grant: ProviderGrant, now: DateTime<Utc>) -> Self {
        let lifetime = grant.expires_in.unwrap_or_else(default_lifetime);
        Self {
            access_token: grant.access_token,
            id_token: grant.id_token.unwrap_or_default(),
            refresh_token: grant.refresh_token.unwrap_or_default(),
            access_token_expires: now + lifetime,
            error: None,
        }
    }

    /// Returns true once the token is within the buffer window of expiry.
    ///
    /// Tokens already marked with a refresh failure never report
    /// refreshable: a failed refresh is not retried automatically, the user
    /// is sent back through sign-in instead.
    #[must_use]
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.error.is_some() {
            return false;
        }
        now >= self.access_token_expires - Duration::minutes(REFRESH_BUFFER_MINUTES)
    }

    /// Applies a successful refresh grant.
    ///
    /// The refresh and id tokens are replaced only when the provider
    /// returned new ones; the sticky error is cleared.
    #[must_use]
    pub fn refreshed(self, grant: ProviderGrant, now: DateTime<Utc>) -> Self {
        let lifetime = grant.expires_in.unwrap_or_else(default_lifetime);
        Self {
            access_token: grant.access_token,
            id_token: grant.id_token.unwrap_or(self.id_token),
            refresh_token: grant.refresh_token.unwrap_or(self.refresh_token),
            access_token_expires: now + lifetime,
            error: None,
        }
    }

    /// Records a failed refresh attempt.
    ///
    /// Every token field is kept as-is so the caller can still inspect the
    /// stale credentials; only the sticky flag changes.
    #[must_use]
    pub fn refresh_failed(self) -> Self {
        Self {
            error: Some(SessionTokenError::RefreshFailed),
            ..self
        }
    }

    /// Returns the bearer credential for backend calls.
    ///
    /// Prefers the id token, falling back to the access token. Signals
    /// [`ReauthRequired`] when the sticky refresh failure is set or the
    /// chosen token carries an `exp` claim that is already past.
    pub fn bearer(&self, now: DateTime<Utc>) -> Result<&str, ReauthRequired> {
        if self.error.is_some() {
            return Err(ReauthRequired);
        }

        let token = if self.id_token.is_empty() {
            &self.access_token
        } else {
            &self.id_token
        };

        if claims::is_expired(token, now) {
            return Err(ReauthRequired);
        }

        Ok(token)
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the id token.
    #[must_use]
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Returns the refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Returns when the access token becomes invalid.
    #[must_use]
    pub fn access_token_expires(&self) -> DateTime<Utc> {
        self.access_token_expires
    }

    /// Returns the sticky failure flag, if set.
    #[must_use]
    pub fn error(&self) -> Option<SessionTokenError> {
        self.error
    }
}
