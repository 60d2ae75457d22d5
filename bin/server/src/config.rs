//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.

use greenline_assistant::LlmConfig;
use serde::Deserialize;

/// Server configuration composed from subsystem configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session cookie configuration.
    pub session: SessionConfig,

    /// Google OAuth configuration.
    pub google: GoogleOAuthConfig,

    /// Operations backend the relay routes forward to.
    pub backend: BackendConfig,

    /// Generative fallback endpoint.
    pub llm: LlmConfig,

    /// Page directory source.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Session-cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret the signed session cookie is keyed from. At least 32 bytes.
    pub cookie_secret: String,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP
    /// development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Session cookie lifetime in days. The refresh token inside the cookie
    /// keeps the access token current for as long as the cookie lives.
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: i64,
}

/// Google OAuth client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOAuthConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URL registered with Google, e.g.
    /// `https://console.greenline.eco/auth/callback`.
    pub redirect_url: String,
}

/// Operations backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL requests are relayed to.
    pub base_url: String,
    /// Static API key used when a session bearer is unavailable.
    pub api_key: String,
}

/// Page directory source configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    /// Path to a generated pages file. The embedded copy is used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_secure_cookies() -> bool {
    true
}

fn default_cookie_max_age_days() -> i64 {
    30
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"cookie_secret": "0123456789abcdef0123456789abcdef"}"#)
                .expect("deserialize");

        assert!(config.secure_cookies);
        assert_eq!(config.cookie_max_age_days, 30);
    }

    #[test]
    fn directory_config_defaults_to_embedded() {
        let config = DirectoryConfig::default();
        assert!(config.path.is_none());
    }
}
