//! Session middleware and extractors.
//!
//! The middleware reads the signed session cookie on every request. Below
//! the refresh threshold the token passes through untouched — the common,
//! cheap path. Past it, one refresh attempt runs against Google; success
//! rewrites the cookie, failure marks the sticky flag and rewrites the
//! cookie too, so the failure is never retried on later requests.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Cookie;
use chrono::Utc;
use greenline_session::SessionToken;

use super::{AppState, SESSION_COOKIE, session_cookie};

/// Refreshes the session token when a request crosses the buffer window.
///
/// The current token is stored in request extensions for extractors;
/// a rewritten cookie is attached to the response when the token changed.
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return next.run(request).await;
    };

    let Ok(token) = serde_json::from_str::<SessionToken>(cookie.value()) else {
        // Unreadable cookie: discard it and continue unauthenticated.
        tracing::warn!("discarding unreadable session cookie");
        let jar = jar.remove(Cookie::from(SESSION_COOKIE));
        let response = next.run(request).await;
        return (jar, response).into_response();
    };

    let (current, rewritten) = if token.should_refresh(Utc::now()) {
        let outcome = state.google.refresh(token.refresh_token()).await;
        let refreshed = match outcome {
            Ok(grant) => token.refreshed(grant, Utc::now()),
            Err(error) => {
                tracing::warn!(error = %error, "session token refresh failed");
                token.refresh_failed()
            }
        };
        (refreshed, true)
    } else {
        (token, false)
    };

    request.extensions_mut().insert(current.clone());
    let response = next.run(request).await;

    if rewritten {
        let token_json = serde_json::to_string(&current).expect("serialize session token");
        let jar = jar.add(session_cookie(token_json, &state.config.session));
        (jar, response).into_response()
    } else {
        response
    }
}

/// Extractor for requiring a signed-in staff member.
///
/// Yields the session token and the bearer credential for backend calls.
/// Requests without a usable credential are redirected to sign-in with the
/// current page preserved as the post-login target.
pub struct RequireSession {
    /// The current session token.
    pub token: SessionToken,
    /// Bearer credential for backend calls (id token, falling back to the
    /// access token).
    pub bearer: String,
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let next = parts.uri.path().to_string();

        let Some(token) = parts.extensions.get::<SessionToken>().cloned() else {
            return Err(AuthRejection::NotAuthenticated { next });
        };

        let bearer = match token.bearer(Utc::now()) {
            Ok(bearer) => bearer.to_string(),
            Err(_) => return Err(AuthRejection::ReauthRequired { next }),
        };

        Ok(RequireSession { token, bearer })
    }
}

/// Rejection type for the session extractor.
#[derive(Debug)]
pub enum AuthRejection {
    /// No session cookie was presented.
    NotAuthenticated { next: String },
    /// The session exists but can no longer produce a valid bearer.
    ReauthRequired { next: String },
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let next = match self {
            Self::NotAuthenticated { next } | Self::ReauthRequired { next } => next,
        };
        Redirect::to(&format!("/auth/login?next={}", next)).into_response()
    }
}
