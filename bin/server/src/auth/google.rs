//! Google OAuth client for staff sign-in and token refresh.
//!
//! Implements the authorization-code grant with PKCE, requesting offline
//! access with a forced consent screen so Google always issues a refresh
//! token. The id token rides the token response through the `oauth2` crate's
//! `ExtraTokenFields` extension point.

use chrono::Duration;
use greenline_session::ProviderGrant;
use oauth2::basic::{
    BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
    BasicTokenType,
};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    ExtraTokenFields, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, Scope,
    StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};

use crate::config::GoogleOAuthConfig;

/// Google OAuth authorization URL.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token URL.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested at sign-in: basic identity plus the document and
/// spreadsheet APIs the console integrates with.
const GOOGLE_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/spreadsheets",
];

/// Extra fields Google returns alongside the standard token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenFields {
    /// The OpenID Connect identity assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

/// Token response type carrying the id token.
type GoogleTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

/// OAuth client type with the custom token response.
type GoogleClient<
    HasAuthUrl = EndpointNotSet,
    HasTokenUrl = EndpointNotSet,
> = oauth2::Client<
    BasicErrorResponse,
    GoogleTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    HasAuthUrl,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    HasTokenUrl,
>;

/// State stored during the OAuth flow.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub csrf_token: String,
    pub pkce_verifier: String,
}

/// Google OAuth client.
#[derive(Debug)]
pub struct GoogleAuthClient {
    client_id: String,
    client_secret: String,
    auth_url: String,
    token_url: String,
    redirect_url: String,
    http_client: reqwest::Client,
}

impl GoogleAuthClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &GoogleOAuthConfig) -> Result<Self, GoogleAuthError> {
        // Validate the URL up front so later builds can't fail
        let _ = RedirectUrl::new(config.redirect_url.clone()).map_err(|e| {
            GoogleAuthError::Configuration(format!("invalid redirect URL: {}", e))
        })?;

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| GoogleAuthError::Configuration(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            redirect_url: config.redirect_url.clone(),
            http_client,
        })
    }

    /// Generates the authorization URL for sign-in.
    ///
    /// Returns the URL to redirect the user to, along with the auth state to
    /// store for the callback.
    pub fn authorization_url(&self) -> (String, AuthState) {
        let client = GoogleClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.auth_url.clone()).expect("valid auth URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_url.clone()).expect("valid redirect URL"),
            );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);

        for scope in GOOGLE_SCOPES {
            auth_request = auth_request.add_scope(Scope::new((*scope).to_string()));
        }

        // Request offline access for a refresh token
        auth_request = auth_request.add_extra_param("access_type", "offline");
        // Force the consent screen so Google reissues the refresh token
        auth_request = auth_request.add_extra_param("prompt", "consent");

        let (auth_url, csrf_token) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    /// Exchanges the authorization code for the initial token grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint rejects the exchange or cannot
    /// be reached.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderGrant, GoogleAuthError> {
        let client = GoogleClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(TokenUrl::new(self.token_url.clone()).expect("valid token URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_url.clone()).expect("valid redirect URL"),
            );

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| GoogleAuthError::TokenExchange(format!("token exchange failed: {}", e)))?;

        Ok(grant_from_response(token_result))
    }

    /// Mints a fresh access token from a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing refresh token, a non-success response
    /// from the token endpoint, or a network failure. The caller records any
    /// of these as a sticky refresh failure on the session token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<ProviderGrant, GoogleAuthError> {
        if refresh_token.is_empty() {
            return Err(GoogleAuthError::MissingRefreshToken);
        }

        let client = GoogleClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(TokenUrl::new(self.token_url.clone()).expect("valid token URL"));

        let token_result = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| GoogleAuthError::Refresh(format!("refresh request failed: {}", e)))?;

        Ok(grant_from_response(token_result))
    }
}

/// Maps a token response onto the session crate's provider grant.
fn grant_from_response(response: GoogleTokenResponse) -> ProviderGrant {
    ProviderGrant {
        access_token: response.access_token().secret().clone(),
        id_token: response.extra_fields().id_token.clone(),
        refresh_token: response.refresh_token().map(|t| t.secret().clone()),
        expires_in: response
            .expires_in()
            .and_then(|d| Duration::from_std(d).ok()),
    }
}

/// Google OAuth errors.
#[derive(Debug)]
pub enum GoogleAuthError {
    /// Configuration error.
    Configuration(String),
    /// Authorization-code exchange failed.
    TokenExchange(String),
    /// Refresh-token grant failed.
    Refresh(String),
    /// The session carries no refresh token to present.
    MissingRefreshToken,
}

impl std::fmt::Display for GoogleAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Google OAuth configuration error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "Google token exchange error: {}", msg),
            Self::Refresh(msg) => write!(f, "Google token refresh error: {}", msg),
            Self::MissingRefreshToken => write!(f, "session has no refresh token"),
        }
    }
}

impl std::error::Error for GoogleAuthError {}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2::AccessToken;

    fn client() -> GoogleAuthClient {
        GoogleAuthClient::new(&GoogleOAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_url: "https://console.greenline.test/auth/callback".to_string(),
        })
        .expect("valid config")
    }

    #[test]
    fn invalid_redirect_url_is_rejected() {
        let err = GoogleAuthClient::new(&GoogleOAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_url: "not a url".to_string(),
        })
        .unwrap_err();

        assert!(matches!(err, GoogleAuthError::Configuration(_)));
    }

    #[test]
    fn authorization_url_requests_offline_consent() {
        let (url, state) = client().authorization_url();

        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("code_challenge="));
        assert!(!state.csrf_token.is_empty());
        assert!(!state.pkce_verifier.is_empty());
    }

    #[test]
    fn authorization_url_carries_identity_and_api_scopes() {
        let (url, _) = client().authorization_url();

        assert!(url.contains("openid"));
        assert!(url.contains("drive.file"));
        assert!(url.contains("spreadsheets"));
    }

    #[tokio::test]
    async fn refresh_without_token_fails_before_any_request() {
        let err = client().refresh("").await.unwrap_err();
        assert!(matches!(err, GoogleAuthError::MissingRefreshToken));
    }

    #[test]
    fn grant_extraction_reads_all_fields() {
        let mut response = GoogleTokenResponse::new(
            AccessToken::new("ya29.access".to_string()),
            BasicTokenType::Bearer,
            IdTokenFields {
                id_token: Some("header.payload.sig".to_string()),
            },
        );
        response.set_refresh_token(Some(RefreshToken::new("1//refresh".to_string())));
        response.set_expires_in(Some(&std::time::Duration::from_secs(3599)));

        let grant = grant_from_response(response);

        assert_eq!(grant.access_token, "ya29.access");
        assert_eq!(grant.id_token.as_deref(), Some("header.payload.sig"));
        assert_eq!(grant.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(grant.expires_in, Some(Duration::seconds(3599)));
    }

    #[test]
    fn grant_extraction_tolerates_sparse_refresh_responses() {
        let response = GoogleTokenResponse::new(
            AccessToken::new("ya29.access".to_string()),
            BasicTokenType::Bearer,
            IdTokenFields { id_token: None },
        );

        let grant = grant_from_response(response);

        assert_eq!(grant.id_token, None);
        assert_eq!(grant.refresh_token, None);
        assert_eq!(grant.expires_in, None);
    }
}
