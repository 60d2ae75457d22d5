//! Generative backend abstraction.
//!
//! Provides a unified interface over OpenAI-compatible chat-completion
//! endpoints, plus the HTTP implementation the server wires in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LlmError;

/// Outbound request timeout. Expiry is treated as a network failure and
/// feeds the same degraded-reply path as an unreachable endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the generative backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key, if the endpoint requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// A request to the generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The user message.
    pub prompt: String,
    /// System prompt, if any.
    pub system: Option<String>,
    /// Temperature for sampling.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// Creates a new request with just a prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Adds a system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A response from the generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text.
    pub content: String,
    /// Model that produced it.
    pub model: String,
}

/// Trait for generative backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, answers with a
    /// non-success status, or produces no usable completion.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Returns the configured model name.
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat-completions backend.
pub struct HttpLlmBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpLlmBackend {
    /// Creates a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl LlmBackend for HttpLlmBackend {
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": request.prompt}));

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Unreachable {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let completion: ChatCompletion =
            response
                .json()
                .await
                .map_err(|e| LlmError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(LlmResponse {
            content,
            model: completion.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Minimal chat-completions response shape.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = LlmRequest::new("What services do we offer?")
            .with_system("You are the operations assistant.")
            .with_temperature(0.4)
            .with_max_tokens(512);

        assert_eq!(request.prompt, "What services do we offer?");
        assert_eq!(
            request.system,
            Some("You are the operations assistant.".to_string())
        );
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.max_tokens, Some(512));
    }

    #[test]
    fn backend_trims_trailing_slash() {
        let backend = HttpLlmBackend::new(LlmConfig {
            base_url: "https://llm.internal/".to_string(),
            model: "greenline-chat".to_string(),
            api_key: None,
        })
        .expect("backend");

        assert_eq!(backend.base_url, "https://llm.internal");
        assert_eq!(backend.model(), "greenline-chat");
    }

    #[test]
    fn completion_parses_with_missing_fields() {
        let completion: ChatCompletion = serde_json::from_str(r#"{}"#).expect("parse");
        assert!(completion.choices.is_empty());

        let completion: ChatCompletion = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":"hi"}}]}"#,
        )
        .expect("parse");
        assert_eq!(completion.choices[0].message.content, "hi");
    }
}
