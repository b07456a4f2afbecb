//! OpenAI-Compatible Chat Completions Provider
//!
//! Streams completions from any endpoint speaking the OpenAI protocol
//! (Groq and OpenAI by default).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{LlmProvider, TextRequest, TextStream};
use crate::ai::stream::{ApiErrorBody, decode_sse};
use crate::config::ProviderConfig;
use crate::constants::network;
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, OverloadError, Result};

/// Chat Completions provider with secure API key handling
pub struct OpenAiProvider {
    name: String,
    /// Read from the environment at construction; a missing key only fails
    /// when a request is actually made
    api_key: Option<SecretString>,
    api_key_env: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key_env = config.resolved_api_key_env().to_string();
        let api_key = std::env::var(&api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                OverloadError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            name: config.provider.to_string(),
            api_key,
            api_key_env,
            api_base: config.resolved_api_base().to_string(),
            model: config.resolved_model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request<'a>(&'a self, request: &'a TextRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: true,
        }
    }

    fn error(&self, category: ErrorCategory, message: impl Into<String>) -> OverloadError {
        LlmError::with_provider(category, message, &self.name).into()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn stream(&self, request: &TextRequest) -> Result<TextStream> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            self.error(
                ErrorCategory::Auth,
                format!("API key not found. Set {} in the environment or .env", self.api_key_env),
            )
        })?;

        info!("Generating with {} (model: {})", self.name, self.model);

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| {
                let category = if e.is_timeout() || e.is_connect() {
                    ErrorCategory::Network
                } else {
                    ErrorCategory::Unknown
                };
                self.error(category, format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
            let message = if envelope.error.message.is_empty() {
                format!("HTTP {}: {}", status, body.trim())
            } else {
                envelope.error.message.clone()
            };
            debug!("{} rejected request with {}", self.name, status);
            return Err(ErrorClassifier::classify_http(
                status.as_u16(),
                envelope.error.code_str(),
                &message,
                &self.name,
            )
            .into());
        }

        Ok(decode_sse(response.bytes_stream(), &self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ApiErrorBody,
}
