//! Relay routes: credential attachment and forwarding.
//!
//! Each route accepts a JSON body, attaches a bearer credential (the
//! session's identity token, falling back to the configured API key), and
//! forwards to the operations backend. Backend errors are surfaced to the
//! caller as `{error, status}` with the original status where meaningful
//! and a generic 502 otherwise.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use greenline_core::RelayRequestId;
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::auth::{AppState, RequireSession};
use crate::config::BackendConfig;

/// Outbound request timeout; expiry surfaces as an unreachable backend.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the operations backend.
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RelayClient {
    /// Creates a relay client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RelayError::Configuration {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Forwards a JSON body to the backend with a bearer credential attached.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-success backend status, an unreachable
    /// backend, or a response that is not JSON.
    pub async fn forward(
        &self,
        path: &str,
        session_bearer: Option<&str>,
        body: JsonValue,
    ) -> Result<JsonValue, RelayError> {
        let request_id = RelayRequestId::new();
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(%request_id, path, "relaying backend request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.bearer(session_bearer))
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%request_id, status = status.as_u16(), "backend returned an error");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RelayError::InvalidResponse {
                reason: e.to_string(),
            })
    }

    /// Picks the outbound bearer: the session credential when present,
    /// the static API key otherwise.
    fn bearer<'a>(&'a self, session_bearer: Option<&'a str>) -> &'a str {
        match session_bearer {
            Some(bearer) if !bearer.is_empty() => bearer,
            _ => &self.api_key,
        }
    }
}

/// Relay errors, rendered as `{error, status}` JSON.
#[derive(Debug)]
pub enum RelayError {
    /// The relay itself is misconfigured.
    Configuration { reason: String },
    /// The backend answered with a non-success status.
    Upstream { status: u16, message: String },
    /// The backend could not be reached (including timeouts).
    Unreachable { reason: String },
    /// The backend answered with a body that is not JSON.
    InvalidResponse { reason: String },
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "relay configuration error: {}", reason),
            Self::Upstream { status, message } => {
                write!(f, "backend returned status {}: {}", status, message)
            }
            Self::Unreachable { reason } => write!(f, "backend unreachable: {}", reason),
            Self::InvalidResponse { reason } => {
                write!(f, "backend returned an invalid response: {}", reason)
            }
        }
    }
}

impl std::error::Error for RelayError {}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Upstream { status, message } => {
                // Relay the original status when it is a real error status;
                // anything odd collapses to 502.
                let code = StatusCode::from_u16(status)
                    .ok()
                    .filter(|c| c.is_client_error() || c.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                let message = if message.is_empty() {
                    "Backend request failed".to_string()
                } else {
                    message
                };
                (code, message)
            }
            Self::Unreachable { reason } => {
                tracing::error!("backend unreachable: {}", reason);
                (StatusCode::BAD_GATEWAY, "Backend unreachable".to_string())
            }
            Self::InvalidResponse { reason } => {
                tracing::error!("invalid backend response: {}", reason);
                (
                    StatusCode::BAD_GATEWAY,
                    "Backend returned an invalid response".to_string(),
                )
            }
            Self::Configuration { reason } => {
                tracing::error!("relay configuration error: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Relay misconfigured".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// `POST /api/business/lookup` — business and site record search.
pub async fn business_lookup(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, RelayError> {
    forward(&state, &session, "/business/lookup", body).await
}

/// `POST /api/documents/generate` — client document generation.
pub async fn generate_document(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, RelayError> {
    forward(&state, &session, "/documents/generate", body).await
}

/// `POST /api/invoices/upload` — supplier invoice intake.
pub async fn upload_invoice(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, RelayError> {
    forward(&state, &session, "/invoices/upload", body).await
}

/// `POST /api/strategy/submit` — client strategy updates.
pub async fn submit_strategy(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, RelayError> {
    forward(&state, &session, "/strategy/submit", body).await
}

async fn forward(
    state: &AppState,
    session: &RequireSession,
    path: &str,
    body: JsonValue,
) -> Result<Json<JsonValue>, RelayError> {
    let reply = state
        .relay
        .forward(path, Some(&session.bearer), body)
        .await?;
    Ok(Json(reply))
}
