//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use chrono::Utc;
use greenline_session::SessionToken;
use serde::Deserialize;
use time::Duration as TimeDuration;

use super::{AUTH_STATE_COOKIE, AppState, SESSION_COOKIE, session_cookie};

/// Query parameters for starting sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Page to return to after sign-in completes.
    #[serde(default)]
    next: Option<String>,
}

/// Query parameters for the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// Serializable auth state for cookie storage.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct AuthStateData {
    csrf_token: String,
    pkce_verifier: String,
    next: String,
}

/// Initiates sign-in by redirecting to Google.
///
/// The requested return page rides along in the state cookie so the
/// callback can land the user back where they started.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let (auth_url, auth_state) = state.google.authorization_url();

    // Only same-origin paths are valid return targets
    let next = query
        .next
        .filter(|n| n.starts_with('/'))
        .unwrap_or_else(|| "/".to_string());

    let auth_state_json = serde_json::to_string(&AuthStateData {
        csrf_token: auth_state.csrf_token,
        pkce_verifier: auth_state.pkce_verifier,
        next,
    })
    .expect("serialize auth state");

    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state_json))
        .path("/")
        .http_only(true)
        .secure(state.config.session.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    (jar.add(cookie), Redirect::to(&auth_url))
}

/// Handles the OAuth callback after the user authenticates with Google.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AuthError> {
    // Retrieve and validate auth state from cookie
    let auth_state_cookie = jar
        .get(AUTH_STATE_COOKIE)
        .ok_or(AuthError::MissingAuthState)?;

    let auth_state_data: AuthStateData =
        serde_json::from_str(auth_state_cookie.value()).map_err(|_| AuthError::InvalidAuthState)?;

    // Validate CSRF token
    if query.state != auth_state_data.csrf_token {
        return Err(AuthError::CsrfMismatch);
    }

    // Exchange the authorization code for the initial grant
    let grant = state
        .google
        .exchange_code(&query.code, &auth_state_data.pkce_verifier)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let token = SessionToken::from_initial_grant(grant, Utc::now());
    let token_json = serde_json::to_string(&token).expect("serialize session token");

    // Set the session cookie, remove the auth state cookie
    let remove_auth_state = Cookie::build((AUTH_STATE_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    let jar = jar
        .add(session_cookie(token_json, &state.config.session))
        .add(remove_auth_state);

    Ok((jar, Redirect::to(&auth_state_data.next)))
}

/// Signs the user out by discarding the session cookie.
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), Redirect::to("/"))
}

/// Authentication errors.
#[derive(Debug)]
pub enum AuthError {
    MissingAuthState,
    InvalidAuthState,
    CsrfMismatch,
    TokenExchange(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthState => (StatusCode::BAD_REQUEST, "Missing auth state"),
            Self::InvalidAuthState => (StatusCode::BAD_REQUEST, "Invalid auth state"),
            Self::CsrfMismatch => (StatusCode::BAD_REQUEST, "CSRF token mismatch"),
            Self::TokenExchange(msg) => {
                tracing::error!("Token exchange failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_state_round_trips_through_cookie_json() {
        let data = AuthStateData {
            csrf_token: "csrf".to_string(),
            pkce_verifier: "verifier".to_string(),
            next: "/invoice-upload".to_string(),
        };

        let json = serde_json::to_string(&data).expect("serialize");
        let parsed: AuthStateData = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(parsed.csrf_token, "csrf");
        assert_eq!(parsed.pkce_verifier, "verifier");
        assert_eq!(parsed.next, "/invoice-upload");
    }

    #[test]
    fn csrf_errors_map_to_bad_request() {
        let response = AuthError::CsrfMismatch.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
