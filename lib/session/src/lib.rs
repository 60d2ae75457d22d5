//! Session token lifecycle for the greenline console.
//!
//! This crate provides:
//! - The session token data model (`SessionToken`), the credential bundle
//!   carried in the signed session cookie
//! - Pure lifecycle transitions: initial grant, proactive refresh, sticky
//!   refresh failure
//! - Bearer-credential selection with best-effort expiry-claim checking
//!
//! # Lifecycle Model
//!
//! A token is created from the provider's authorization-code exchange, read on
//! every authenticated request, and refreshed once it crosses the buffer
//! window ahead of its access-token expiry. A failed refresh marks the token
//! with a sticky error; the next bearer-credential read then signals that the
//! user must sign in again. Nothing in this crate performs I/O — the provider
//! call itself lives with the server, and every transition here is a pure
//! function of `(token, grant, now)`.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use greenline_session::{ProviderGrant, SessionToken};
//!
//! let now = Utc::now();
//! let token = SessionToken::from_initial_grant(
//!     ProviderGrant {
//!         access_token: "ya29.access".to_string(),
//!         id_token: Some("header.payload.sig".to_string()),
//!         refresh_token: Some("1//refresh".to_string()),
//!         expires_in: Some(Duration::hours(1)),
//!     },
//!     now,
//! );
//!
//! // Well inside the expiry window: nothing to do.
//! assert!(!token.should_refresh(now));
//! ```

pub mod claims;
pub mod error;
pub mod token;

pub use error::{ReauthRequired, SessionTokenError};
pub use token::{ProviderGrant, SessionToken};
