//! Anthropic chat adapter
//!
//! Implements `ChatModel` against `POST /v1/messages`. The messages API has
//! two quirks this adapter absorbs: system prompts travel in a top-level
//! `system` field rather than the message list, and `max_tokens` is
//! mandatory (the configured cap applies when the request sets none).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::AnthropicConfig;
use crate::error::ChatError;
use crate::ports::{ChatModel, ChatRequest, ChatResponse, ChatRole, TokenUsage};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic chat adapter
#[derive(Debug, Clone)]
pub struct AnthropicChat {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicChat {
    /// Create a new Anthropic chat adapter
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if the configuration is invalid.
    pub fn new(config: AnthropicConfig) -> Result<Self, ChatError> {
        config.validate().map_err(ChatError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn resolve_model<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }

    /// Split a conversation into the top-level system prompt and the
    /// user/assistant turns the messages API accepts.
    fn split_system(request: &ChatRequest) -> (Option<String>, Vec<WireMessage<'_>>) {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .collect();

        let turns = request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let system = if system.is_empty() {
            None
        } else {
            Some(system.join("\n\n"))
        };

        (system, turns)
    }
}

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Messages API response body
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Anthropic API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[async_trait]
impl ChatModel for AnthropicChat {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let model = self.resolve_model(&request).to_string();
        let (system, messages) = Self::split_system(&request);

        let body = MessagesRequest {
            model: &model,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            messages,
            system,
            temperature: request.temperature,
        };

        debug!("Sending messages request to Anthropic");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Messages request failed");

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return match api_error.error.error_type.as_str() {
                    "rate_limit_error" => Err(ChatError::RateLimited),
                    "not_found_error" => Err(ChatError::ModelNotAvailable(model)),
                    _ => Err(ChatError::ServerError(api_error.error.message)),
                };
            }
            return Err(ChatError::ServerError(format!("Status {status}: {body}")));
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let content: String = messages_response
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .map(|b| b.text.as_str())
            .collect();

        if content.is_empty() {
            return Err(ChatError::InvalidResponse(
                "Response contains no text blocks".to_string(),
            ));
        }

        let usage = messages_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        debug!(tokens = ?usage, "Messages request finished");

        Ok(ChatResponse {
            content,
            model: messages_response.model,
            usage,
            finish_reason: messages_response.stop_reason,
        })
    }

    fn provider_id(&self) -> &'static str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}
